//! # API Errors
//!
//! The request-level error taxonomy and its HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::backend::BackendError;
use crate::ids::CodecError;
use crate::relational::StoreError;
use crate::response::ErrorEnvelope;

/// Result type for service operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Request-level failures
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Malformed identifier or argument
    #[error("{0}")]
    InvalidArgument(String),

    /// Unknown route
    #[error("{0}")]
    NotFound(String),

    /// Known route, unsupported method
    #[error("{0}")]
    MethodNotAllowed(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Both search endpoints failed, or answered garbage
    #[error("{0}")]
    BackendUnavailable(#[from] BackendError),

    /// Relational store gave up
    #[error("{0}")]
    PersistenceUnavailable(#[from] StoreError),

    /// Worker task failure
    #[error("{0}")]
    Internal(String),
}

impl From<CodecError> for ApiError {
    fn from(err: CodecError) -> Self {
        ApiError::InvalidArgument(err.to_string())
    }
}

impl ApiError {
    /// Taxonomy name carried in the error envelope
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidArgument(_) => "InvalidArgument",
            ApiError::NotFound(_) => "NotFound",
            ApiError::MethodNotAllowed(_) => "MethodNotAllowed",
            ApiError::BackendUnavailable(_) => "BackendUnavailable",
            ApiError::PersistenceUnavailable(_) => "PersistenceUnavailable",
            ApiError::Internal(_) => "InternalError",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::PersistenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorEnvelope::from(&self));
        (status, body).into_response()
    }
}
