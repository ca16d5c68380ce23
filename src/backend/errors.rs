//! # Backend Errors

use thiserror::Error;

/// Result type for search backend calls
pub type BackendResult<T> = Result<T, BackendError>;

/// Failure of a single attempt against one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("reading response from {url} failed: {message}")]
    Body { url: String, message: String },
}

/// Terminal search backend errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Primary and secondary both failed
    #[error("search backend unavailable (primary: {primary}; secondary: {secondary})")]
    Unavailable {
        primary: TransportError,
        secondary: TransportError,
    },

    /// An endpoint answered successfully with a body that could not be decoded
    #[error("malformed search response: {0}")]
    MalformedResponse(String),
}
