//! Pending requests produced by verb access on a node.
//!
//! # Design
//! An `Action` is the request handle returned when a node resolves to a
//! verb. It already carries the resolved URL and the merged headers, and
//! can be configured further (`set`, `send`) before it is either turned into
//! a plain `HttpRequest` with `build` or dispatched through a `Transport`
//! with `end` / `end_with`.
//!
//! Problems that can only show up at dispatch time (an unresolvable path, a
//! payload that does not serialize) are stored and reported by `build`, so
//! creating and configuring an `Action` never fails.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::redact_url;
use crate::error::TransportError;
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq)]
enum Payload {
    Empty,
    Json(Value),
    Invalid(String),
}

/// A request bound to a verb and a resolved URL, not yet sent.
#[derive(Debug, Clone)]
pub struct Action {
    method: HttpMethod,
    path: String,
    url: Result<Url, url::ParseError>,
    headers: Headers,
    payload: Payload,
}

impl Action {
    pub(crate) fn new(
        method: HttpMethod,
        path: String,
        url: Result<Url, url::ParseError>,
        headers: Headers,
    ) -> Self {
        Self {
            method,
            path,
            url,
            headers,
            payload: Payload::Empty,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The accumulated path, before resolution against the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The absolute request URL, or `None` if the path did not resolve.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref().ok()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn payload(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Json(value) => Some(value),
            Payload::Empty | Payload::Invalid(_) => None,
        }
    }

    /// Set a header on this request only.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach a payload. A string payload is sent as-is, anything else is
    /// sent as JSON.
    pub fn send<T: Serialize + ?Sized>(mut self, data: &T) -> Self {
        self.payload = match serde_json::to_value(data) {
            Ok(value) => Payload::Json(value),
            Err(e) => Payload::Invalid(e.to_string()),
        };
        self
    }

    /// Produce the plain-data request without touching the network.
    pub fn build(&self) -> Result<HttpRequest, TransportError> {
        let url = self
            .url
            .as_ref()
            .map_err(|source| TransportError::InvalidUrl {
                path: self.path.clone(),
                source: *source,
            })?;

        let body = match &self.payload {
            Payload::Empty => None,
            Payload::Json(Value::String(raw)) => Some(raw.clone()),
            Payload::Json(value) => Some(
                serde_json::to_string(value)
                    .map_err(|e| TransportError::Serialization(e.to_string()))?,
            ),
            Payload::Invalid(msg) => return Err(TransportError::Serialization(msg.clone())),
        };

        Ok(HttpRequest {
            method: self.method,
            url: url.to_string(),
            headers: self.headers.clone().into_vec(),
            body,
        })
    }

    /// Send the request and return the transport's outcome.
    pub fn end<T: Transport + ?Sized>(self, transport: &T) -> Result<HttpResponse, TransportError> {
        let request = self.build()?;
        debug!(method = %request.method, url = %redact_url(&request.url), body = request.body.is_some(), "dispatching request");
        transport.execute(request)
    }

    /// Send the request and hand the outcome to `callback`, which is called
    /// exactly once.
    pub fn end_with<T, F>(self, transport: &T, callback: F)
    where
        T: Transport + ?Sized,
        F: FnOnce(Result<HttpResponse, TransportError>),
    {
        callback(self.end(transport));
    }
}
