//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod files;
pub mod health;


/// Creates the API router. Every route sees the optional auth middleware;
/// handlers decide whether they need an authenticated caller.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(files::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}
