//! Session-cookie middleware.
//!
//! Resolves the request's session once, up front, and stashes the result as
//! an extension. Every failure mode (no cookie, bad signature, tampered
//! ciphertext, unknown token, expired or revoked session, datastore error)
//! resolves to the same anonymous context.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::security::hash_token;
use crate::ports::Session;

use super::super::{AppState, SESSION_COOKIE};

/// The request's resolved session. `None` means anonymous.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

/// Plucks one cookie out of the `Cookie` header.
pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then(|| v.to_string())
    })
}

pub async fn session_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = resolve_session(&state, request.headers()).await;
    request.extensions_mut().insert(CurrentSession(session));
    next.run(request).await
}

async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let sealed = cookie_value(headers, SESSION_COOKIE)?;
    let token = state.unseal_token(&sealed)?;
    // validate() already folds datastore errors into None.
    state
        .sessions
        .validate(&hash_token(&token))
        .await
        .ok()
        .flatten()
}
