//! HTTP handlers for the session endpoints.
//!
//! The session middleware has already resolved the request's session by the
//! time these run; handlers read the [`CurrentSession`] extension rather
//! than touching the cookie themselves. Bootstrap is the exception, since
//! it exists to mint the cookie in the first place.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::security::{generate_token, hash_token};
use crate::ports::{CsrfToken, Session};

use super::super::middleware::CurrentSession;
use super::super::{AppState, SESSION_COOKIE};
use super::dto::{BootstrapResponse, ErrorResponse, ExtendSessionResponse, IssueCsrfResponse};

fn session_cookie(sealed: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, sealed, max_age_secs
    )
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("INTERNAL_ERROR", "Internal server error")),
    )
        .into_response()
}

fn session_required() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new("SESSION_REQUIRED", "No valid session")),
    )
        .into_response()
}

async fn issue_csrf(
    state: &AppState,
    session_id: SessionId,
) -> Result<(String, Timestamp), Response> {
    let token = generate_token();
    let now = Timestamp::now();
    let expires_at = now.add_seconds(state.security.csrf_ttl_secs);
    let record = CsrfToken {
        token_hash: hash_token(&token),
        session_id,
        issued_at: now,
        expires_at,
    };
    state.csrf_tokens.store(&record).await.map_err(|e| {
        tracing::error!(error = %e.message, "csrf token store failed");
        internal_error()
    })?;
    Ok((token, expires_at))
}

/// POST /api/session/bootstrap - Start an anonymous session
///
/// Issues the session cookie (signed, encrypted bearer token) plus a first
/// CSRF token. Session creation failure is a 500, not a degraded page: a
/// visitor who cannot get a session cannot check out.
pub async fn bootstrap_session(State(state): State<AppState>) -> Response {
    let token = generate_token();
    let now = Timestamp::now();
    let expires_at = now.add_seconds(state.security.session_ttl_secs);
    let session = Session {
        id: SessionId::new(),
        token_hash: hash_token(&token),
        user_id: None,
        data: serde_json::json!({}),
        created_at: now,
        last_accessed_at: now,
        expires_at,
    };

    if let Err(e) = state.sessions.create(&session).await {
        tracing::error!(error = %e.message, "session creation failed");
        return internal_error();
    }

    let (csrf_token, _) = match issue_csrf(&state, session.id).await {
        Ok(issued) => issued,
        Err(response) => return response,
    };

    let sealed = state.seal_token(&token);
    let body = BootstrapResponse {
        csrf_token,
        session_expires_at: expires_at.as_datetime().to_rfc3339(),
    };
    (
        StatusCode::CREATED,
        [(
            SET_COOKIE,
            session_cookie(&sealed, state.security.session_ttl_secs),
        )],
        Json(body),
    )
        .into_response()
}

/// POST /api/session/csrf - Issue a CSRF token for one mutating request
///
/// Tokens are only handed to holders of a live session, and are only valid
/// when presented by that same session.
pub async fn issue_csrf_token(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Response {
    let Some(session) = current.0 else {
        return session_required();
    };

    match issue_csrf(&state, session.id).await {
        Ok((csrf_token, expires_at)) => Json(IssueCsrfResponse {
            csrf_token,
            expires_at: expires_at.as_datetime().to_rfc3339(),
        })
        .into_response(),
        Err(response) => response,
    }
}

/// POST /api/session/logout - Revoke the current session
///
/// Idempotent: logging out without a valid session still clears the cookie
/// and returns 204.
pub async fn logout_session(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Response {
    if let Some(session) = current.0 {
        if let Err(e) = state.sessions.revoke(&session.token_hash).await {
            tracing::error!(error = %e.message, "session revoke failed");
            return internal_error();
        }
    }

    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, session_cookie("", 0))],
    )
        .into_response()
}

/// POST /api/session/extend - Push the session expiry forward ("remember me")
pub async fn extend_session(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Response {
    let Some(session) = current.0 else {
        return session_required();
    };

    let new_expiry = Timestamp::now().add_seconds(state.security.session_ttl_secs);
    match state.sessions.extend(&session.token_hash, new_expiry).await {
        Ok(Some(session)) => Json(ExtendSessionResponse {
            session_expires_at: session.expires_at.as_datetime().to_rfc3339(),
        })
        .into_response(),
        Ok(None) => session_required(),
        Err(e) => {
            tracing::error!(error = %e.message, "session extend failed");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_httponly_and_scoped() {
        let cookie = session_cookie("sealed-value", 3600);
        assert!(cookie.starts_with("shopcore_session=sealed-value;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        assert!(session_cookie("", 0).contains("Max-Age=0"));
    }
}
