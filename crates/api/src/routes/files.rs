//! Attachment file routes.
//!
//! ```text
//! POST   /files                upload (multipart: file, is_public)
//! GET    /files/{id}           metadata
//! DELETE /files/{id}           delete (owner or trusted caller)
//! GET    /files/{id}/content   download
//! ```

use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, FILE_NOT_FOUND},
    middleware::{AuthUser, Requester},
};
use chewy_core::attachment::{Download, UploadInput};
use chewy_core::permission::PermissionChecker;
use chewy_core::storage::DEFAULT_MIME_TYPE;
use chewy_shared::AppError;

/// Creates the file routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/files", post(upload_file))
        .route("/files/{id}", get(get_file).delete(delete_file))
        .route("/files/{id}/content", get(download_file))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a path identifier. Malformed identifiers cannot name a file.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError(AppError::NotFound(FILE_NOT_FOUND.to_string())))
}

/// Parse a form boolean.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn multipart_error(err: &MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError(AppError::PayloadTooLarge(err.body_text()))
    } else {
        ApiError(AppError::Validation(err.body_text()))
    }
}

/// Filename safe to place inside a quoted `Content-Disposition` value.
fn disposition_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    if cleaned.trim().is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

/// Uploaded file part.
struct FilePart {
    name: String,
    content: Bytes,
}

/// Fields of the upload form.
struct UploadForm {
    file: Option<FilePart>,
    is_public: bool,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm {
        file: None,
        is_public: false,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "file" => {
                let name = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await.map_err(|e| multipart_error(&e))?;
                form.file = Some(FilePart { name, content });
            }
            "is_public" => {
                let value = field.text().await.map_err(|e| multipart_error(&e))?;
                form.is_public = parse_bool(&value).ok_or_else(|| {
                    ApiError(AppError::Validation(
                        "is_public must be a boolean".to_string(),
                    ))
                })?;
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Build the streaming response for an authorised download.
async fn content_response(state: &AppState, download: Download) -> Result<Response, ApiError> {
    let Download {
        attachment,
        location,
    } = download;

    let body = if let Some(local_path) = &location.local_path {
        let file = tokio::fs::File::open(local_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ApiError(AppError::NotFound(FILE_NOT_FOUND.to_string()))
            } else {
                ApiError(AppError::Storage(e.to_string()))
            }
        })?;
        Body::from_stream(ReaderStream::new(file))
    } else {
        let bytes = state
            .attachments
            .storage()
            .read_file(&location.storage_path)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ApiError(AppError::NotFound(FILE_NOT_FOUND.to_string()))
                } else {
                    ApiError(AppError::Storage(e.to_string()))
                }
            })?;
        Body::from(bytes)
    };

    let content_type = HeaderValue::from_str(&attachment.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_MIME_TYPE));
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        disposition_filename(&attachment.original_name)
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, location.size)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(body)
        .map_err(|e| {
            error!(error = %e, "Failed to build response");
            ApiError(AppError::Internal(e.to_string()))
        })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/files`
/// Upload a file. The caller becomes its owner.
async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_upload_form(multipart).await?;

    let Some(file) = form.file else {
        return Err(ApiError(AppError::Validation(
            "No file provided".to_string(),
        )));
    };
    if file.content.is_empty() {
        return Err(ApiError(AppError::Validation(
            "The submitted file is empty".to_string(),
        )));
    }

    let attachment = state
        .attachments
        .upload(UploadInput {
            original_name: file.name,
            content: file.content,
            owner_id: auth.user_id().to_string(),
            is_public: form.is_public,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(state.presenter.present(&attachment)),
    ))
}

/// GET `/files/{id}`
/// Attachment metadata.
async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let attachment = state.attachments.get(id).await?;

    Ok(Json(state.presenter.present(&attachment)))
}

/// DELETE `/files/{id}`
/// Remove a file's content and record.
async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let attachment = state.attachments.get(id).await?;

    if !PermissionChecker::can_delete(&attachment.to_file_metadata(), &auth.requester()) {
        warn!(attachment_id = %id, user_id = %auth.user_id(), "Delete denied");
        return Err(ApiError(AppError::Forbidden(
            "You do not have permission to delete this file".to_string(),
        )));
    }

    state.attachments.delete(id).await?;
    info!(attachment_id = %id, user_id = %auth.user_id(), "File deleted via API");

    Ok(StatusCode::NO_CONTENT)
}

/// GET `/files/{id}/content`
/// Stream a file's content if the requester may download it.
async fn download_file(
    State(state): State<AppState>,
    Requester(requester): Requester,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let download = state.attachments.download(id, &requester).await?;

    content_response(&state, download).await
}
