//! The HTTP client collaborator.
//!
//! # Design
//! `Transport` is the only place network I/O happens. `Action` hands it a
//! fully built `HttpRequest` and gets back either an `HttpResponse` or the
//! client's error, untouched. Closures implement the trait too, which keeps
//! tests free of sockets.
//!
//! `UreqTransport` is the default implementation. It disables ureq's own
//! status handling so the response body is still available when the server
//! answers with an error status, then applies its own policy: non-2xx is a
//! `TransportError::Status` unless `with_status_as_error(false)` is set.

use std::fmt;

use tracing::{instrument, trace, warn};
use ureq::typestate::{WithBody, WithoutBody};
use ureq::RequestBuilder;

use crate::config::redact_url;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes plain-data requests against the network.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    status_as_error: bool,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::with_agent(agent)
    }

    /// Wrap a caller-configured agent. The agent should be built with
    /// `http_status_as_error(false)`, otherwise error bodies are lost before
    /// this transport sees them.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self {
            agent,
            status_as_error: true,
        }
    }

    /// Whether non-2xx responses become `TransportError::Status`.
    pub fn with_status_as_error(mut self, enabled: bool) -> Self {
        self.status_as_error = enabled;
        self
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("status_as_error", &self.status_as_error)
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    #[instrument(skip_all, fields(method = %request.method, url = %redact_url(&request.url)))]
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get => send_without_body(self.agent.get(&url), &headers, body),
            HttpMethod::Delete => send_without_body(self.agent.delete(&url), &headers, body),
            HttpMethod::Post => send_with_body(self.agent.post(&url), &headers, body),
            HttpMethod::Put => send_with_body(self.agent.put(&url), &headers, body),
        };
        let mut response = result.inspect_err(|e| warn!(error = %e, "request failed"))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;
        trace!(status, bytes = body.len(), "response received");

        let response = HttpResponse {
            status,
            headers,
            body,
        };
        if self.status_as_error && !response.is_success() {
            warn!(status, "server returned error status");
            return Err(TransportError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }
}

type UreqResult = Result<ureq::http::Response<ureq::Body>, ureq::Error>;

fn send_without_body(
    mut builder: RequestBuilder<WithoutBody>,
    headers: &[(String, String)],
    body: Option<String>,
) -> UreqResult {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    match body {
        Some(body) => builder.force_send_body().send(body.as_bytes()),
        None => builder.call(),
    }
}

fn send_with_body(
    mut builder: RequestBuilder<WithBody>,
    headers: &[(String, String)],
    body: Option<String>,
) -> UreqResult {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
