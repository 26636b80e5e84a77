//! Error types for the proxy builder.
//!
//! # Design
//! Configuration problems are reported by the constructors, before any node
//! exists. Everything that goes wrong once a request is dispatched lands in
//! `TransportError`, which carries the HTTP client's own error unchanged so
//! callers see exactly what the collaborator reported. Building paths never
//! fails.

use thiserror::Error;

/// Errors returned by `create` and `create_from_value`.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// No base URL was given, or it was empty.
    #[error("must define restproxy base API URL")]
    MissingBase,

    /// The base URL in a configuration document was not a string.
    #[error("restproxy base API URL must be a string, found {found}")]
    BaseNotString { found: &'static str },

    /// The base URL is a string but not an absolute URL.
    #[error("invalid restproxy base API URL {base:?}: {source}")]
    InvalidBase {
        base: String,
        #[source]
        source: url::ParseError,
    },

    /// The `methodAliases` or `headers` options could not be decoded.
    #[error("invalid restproxy options: {0}")]
    InvalidOptions(String),
}

/// Errors surfaced when a request is dispatched.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client failed: connection, TLS, protocol or header errors.
    #[error("HTTP transport failed: {0}")]
    Http(#[from] ureq::Error),

    /// The server answered with a non-2xx status and the transport treats
    /// that as a failure.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The accumulated path could not be resolved against the base URL.
    #[error("cannot resolve path {path:?} against base URL: {source}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl TransportError {
    /// The HTTP status carried by this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
