//! Axum router for the session endpoints.

use axum::middleware;
use axum::routing::post;
use axum::Router;

use super::super::middleware::csrf::require_csrf_token;
use super::super::middleware::session::session_context;
use super::super::AppState;
use super::handlers::{bootstrap_session, extend_session, issue_csrf_token, logout_session};

/// Create the session API router.
///
/// # Routes
/// - `POST /bootstrap` - Start an anonymous session (no CSRF; nothing to
///   forge yet)
/// - `POST /csrf` - Issue a one-shot CSRF token for the current session
/// - `POST /logout` - Revoke the current session
/// - `POST /extend` - Push the session expiry forward
pub fn session_routes(state: AppState) -> Router<AppState> {
    // Extend is a mutating, session-bound action and goes through CSRF
    // enforcement. Bootstrap, token issuance and logout do not: the first
    // two exist to make tokens available at all, and revoking one's own
    // session is not a side effect worth forging.
    let protected = Router::new()
        .route("/extend", post(extend_session))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_csrf_token,
        ));

    Router::new()
        .route("/bootstrap", post(bootstrap_session))
        .route("/csrf", post(issue_csrf_token))
        .route("/logout", post(logout_session))
        .merge(protected)
        .layer(middleware::from_fn_with_state(state, session_context))
}
