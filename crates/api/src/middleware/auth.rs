//! Bearer token authentication.
//!
//! Authentication is optional: requests without an `Authorization` header
//! proceed as anonymous, while a header carrying a bad token is rejected.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, error::ApiError};
use chewy_core::permission::RequesterContext;
use chewy_shared::{AppError, Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(message: &str) -> Response {
    ApiError(AppError::Unauthorized(message.to_string())).into_response()
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Lets requests without an Authorization header through untouched
/// 2. Validates a present Bearer token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = request.headers().get(AUTHORIZATION) else {
        return next.run(request).await;
    };

    let Some(token) = auth_header.to_str().ok().and_then(extract_bearer_token) else {
        return unauthorized("Authorization header must carry a Bearer token");
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => unauthorized("Token has expired"),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthorized("Invalid or malformed token")
        }
    }
}

/// Extractor for authenticated user claims.
///
/// Rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.0.user_id()
    }

    /// Requester context for core access decisions.
    #[must_use]
    pub fn requester(&self) -> RequesterContext {
        RequesterContext::new(Some(self.0.sub.clone()), self.0.is_trusted())
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .filter(|claims| !claims.sub.is_empty())
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::Unauthorized("Authentication required".to_string())))
    }
}

/// Extractor for the requester, anonymous when no token was sent.
#[derive(Debug, Clone)]
pub struct Requester(pub RequesterContext);

impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts.extensions.get::<Claims>().map_or_else(
            RequesterContext::anonymous,
            |claims| RequesterContext::new(Some(claims.sub.clone()), claims.is_trusted()),
        );
        Ok(Self(context))
    }
}
