//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
///
/// Expected business outcomes (missing vehicles, validation failures) travel
/// inside [`ServiceResult`](crate::responses::ServiceResult) instead. This
/// enum covers failures the caller cannot fix by changing the request.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller broke an input contract (zero page size, page zero, ...)
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Unexpected repository failure
    #[error("{0}")]
    Repository(RepositoryError),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a contract violation error
    pub fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }
}

/// Error response body
///
/// Shares the `success`/`error` field names with
/// [`ServiceResult`](crate::responses::ServiceResult) so clients can parse
/// every body the same way.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,

    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: None,
        }
    }

    /// Create error response with a code
    pub fn with_code(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: Some(code.into()),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let error_response = match self {
            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                ErrorResponse::with_code("CONFIG_ERROR", "Service misconfigured")
            }
            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                ErrorResponse::with_code("IO_ERROR", "I/O operation failed")
            }
            Error::ContractViolation(msg) => {
                tracing::error!("Contract violation: {}", msg);
                ErrorResponse::with_code("CONTRACT_VIOLATION", "Internal server error")
            }
            Error::Repository(ref e) => {
                tracing::error!(
                    operation = %e.operation,
                    kind = %e.kind,
                    entity_type = ?e.entity_type,
                    entity_id = ?e.entity_id,
                    retriable = e.is_retriable(),
                    "Repository error: {}", e.message
                );
                ErrorResponse::with_code(
                    format!("REPOSITORY_{}", e.kind.to_string().to_uppercase()),
                    "Storage operation failed",
                )
            }
            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse::with_code("INTERNAL_ERROR", "Internal server error")
            }
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)).into_response()
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        Error::Repository(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryOperation;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Something broke");
        assert!(!err.success);
        assert_eq!(err.error, "Something broke");
        assert!(err.code.is_none());
    }

    #[test]
    fn test_error_response_with_code() {
        let err = ErrorResponse::with_code("INTERNAL_ERROR", "Internal server error");
        assert_eq!(err.code, Some("INTERNAL_ERROR".to_string()));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_error_response_serializes_success_flag() {
        let json = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("code").is_none());
    }

    #[test]
    fn test_contract_violation_display() {
        let err = Error::contract("page size must be at least 1");
        assert_eq!(
            err.to_string(),
            "Contract violation: page size must be at least 1"
        );
    }

    #[test]
    fn test_every_error_maps_to_internal_server_error() {
        let errors = vec![
            Error::contract("bad input"),
            Error::Internal("boom".to_string()),
            Error::Repository(RepositoryError::other(
                RepositoryOperation::FindAll,
                "store unavailable",
            )),
        ];

        for err in errors {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_repository_error_conversion() {
        let err: Error = RepositoryError::not_found("Vehicle", "abc").into();
        assert!(matches!(err, Error::Repository(_)));
    }
}
