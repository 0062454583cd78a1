//! Domain error types for the inventory orders server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Local filesystem operation failed
    #[error("File system error: {0}")]
    FileSystem(String),

    /// Resource not found. The message is shown to the caller as-is.
    #[error("{0}")]
    NotFound(String),

    /// Metadata exists but the backing file is gone
    #[error("File not found on disk")]
    FileMissing { path: String },

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Upload exceeds the configured size limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Server is temporarily unable to handle the request
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Unexpected failure with an endpoint-specific public message
    #[error("{public}")]
    Internal { public: &'static str, detail: String },
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::FileSystem(_) => (StatusCode::INTERNAL_SERVER_ERROR, "FILE_SYSTEM_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::FileMissing { .. } => (StatusCode::NOT_FOUND, "FILE_MISSING"),
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code) = self.status_and_code();

        // Internal detail is logged, never returned to the caller.
        let message = match self {
            AppError::Database(detail) => {
                tracing::error!("Database error: {}", detail);
                "An internal database error occurred".to_string()
            }
            AppError::FileSystem(detail) => {
                tracing::error!("File system error: {}", detail);
                "An internal storage error occurred".to_string()
            }
            AppError::FileMissing { path } => {
                tracing::warn!(path = %path, "Document metadata present but file is missing");
                self.to_string()
            }
            AppError::Internal { public, detail } => {
                tracing::error!("{}: {}", public, detail);
                public.to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: message,
            code: code.to_string(),
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.error)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileSystem(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("Invalid UUID: {}", err))
    }
}
