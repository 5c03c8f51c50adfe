//! Error handling for the gateway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
    /// Bad request.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Not found.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl ErrorResponse {
    /// Build an error body with the given code.
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: true,
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl From<msgrelay_core::Error> for AppError {
    fn from(err: msgrelay_core::Error) -> Self {
        match err {
            msgrelay_core::Error::NotFound(id) => {
                AppError::NotFound(format!("message {} not found", id))
            }
            // Persistence failures are server-side faults.
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_not_found_maps_to_not_found() {
        let err = AppError::from(msgrelay_core::Error::NotFound(7));
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_core_io_maps_to_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = AppError::from(msgrelay_core::Error::Io(io));
        assert!(matches!(err, AppError::Internal(_)));
    }
}
