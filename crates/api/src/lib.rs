//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - The attachment REST routes, mounted under `/api/attachments`
//! - Optional bearer token authentication
//! - Mapping of core errors onto HTTP responses

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, http::header::AUTHORIZATION};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

use chewy_core::attachment::{AttachmentPresenter, AttachmentService};
use chewy_core::storage::StorageService;
use chewy_db::AttachmentRepository;
use chewy_shared::JwtService;

/// Room left in a request body for multipart framing and form fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Attachment lifecycle service.
    pub attachments: AttachmentService<AttachmentRepository>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Renders attachment records for clients.
    pub presenter: Arc<AttachmentPresenter>,
}

impl AppState {
    /// Wire the attachment service over a database connection and storage engine.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<StorageService>,
        jwt_service: Arc<JwtService>,
        presenter: AttachmentPresenter,
    ) -> Self {
        let repo = Arc::new(AttachmentRepository::new(db));
        Self {
            attachments: AttachmentService::new(storage, repo),
            jwt_service,
            presenter: Arc::new(presenter),
        }
    }

    /// Largest request body the upload route accepts.
    #[must_use]
    pub fn body_limit(&self) -> usize {
        let max_file_size = self.attachments.storage().config().max_file_size;
        usize::try_from(max_file_size)
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/attachments", routes::api_routes_with_state(state.clone()))
        .layer(DefaultBodyLimit::max(state.body_limit()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(SetSensitiveRequestHeadersLayer::new([AUTHORIZATION]))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
