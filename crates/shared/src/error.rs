//! Application-wide error types.
//!
//! Every adapter maps its failures onto [`AppError`] so the HTTP layer has a
//! single place that decides status codes and machine-readable codes.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request body exceeds the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Backing store error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::PayloadTooLarge(_) => 413,
            Self::Database(_) | Self::Storage(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message safe to show a client.
    ///
    /// Server-side failures hide their detail; it is logged instead.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::PayloadTooLarge(msg) => msg.clone(),
            Self::Database(_) | Self::Storage(_) | Self::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    /// True for errors that indicate a server-side fault.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
