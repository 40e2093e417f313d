//! HTTP rendering of application errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use chewy_core::attachment::AttachmentError;
use chewy_core::storage::StorageError;
use chewy_shared::AppError;

/// Message shared by every not-found outcome so clients cannot tell a
/// missing record from missing content.
pub const FILE_NOT_FOUND: &str = "File not found";

/// Error type returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AttachmentError> for ApiError {
    fn from(err: AttachmentError) -> Self {
        let app = match err {
            AttachmentError::Validation(msg) => AppError::Validation(msg),
            AttachmentError::NotFound(_) | AttachmentError::ContentNotFound(_) => {
                AppError::NotFound(FILE_NOT_FOUND.to_string())
            }
            AttachmentError::PermissionDenied(_) => AppError::Forbidden(
                "You do not have permission to download this file".to_string(),
            ),
            AttachmentError::Storage(e @ StorageError::FileTooLarge { .. }) => {
                AppError::PayloadTooLarge(e.to_string())
            }
            AttachmentError::Storage(e @ StorageError::InvalidMimeType { .. }) => {
                AppError::Validation(e.to_string())
            }
            AttachmentError::Storage(e) => AppError::Storage(e.to_string()),
            AttachmentError::Repository(msg) => AppError::Database(msg),
        };
        Self(app)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        }

        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": err.public_message()
            })),
        )
            .into_response()
    }
}
