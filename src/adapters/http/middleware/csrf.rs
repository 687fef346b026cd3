//! CSRF enforcement middleware.
//!
//! Mutating methods must carry an `X-CSRF-Token` header holding a token
//! previously issued to the requester's session. The token is consumed on
//! use; a second submit with the same token is rejected, as is a token
//! presented by any other session. Safe methods pass through untouched.

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};

use crate::domain::security::hash_token;

use super::super::session::dto::ErrorResponse;
use super::super::AppState;
use super::session::CurrentSession;

pub const CSRF_HEADER: &str = "x-csrf-token";

fn csrf_rejection() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ErrorResponse::new("CSRF_REJECTED", "CSRF validation failed")),
    )
        .into_response()
}

pub async fn require_csrf_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    ) {
        return next.run(request).await;
    }

    let Some(token) = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
    else {
        return csrf_rejection();
    };

    // Tokens are session-bound; without a resolved session there is nothing
    // a token could be valid against.
    let Some(session_id) = request
        .extensions()
        .get::<CurrentSession>()
        .and_then(|current| current.0.as_ref())
        .map(|session| session.id)
    else {
        return csrf_rejection();
    };

    match state
        .csrf_tokens
        .validate_and_consume(&hash_token(&token), &session_id)
        .await
    {
        Ok(true) => next.run(request).await,
        Ok(false) => csrf_rejection(),
        Err(e) => {
            // Fail closed; a broken store must not disable CSRF protection.
            tracing::error!(error = %e.message, "csrf consume query failed");
            csrf_rejection()
        }
    }
}
