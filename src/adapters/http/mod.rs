//! HTTP adapters.
//!
//! Axum routers, handlers and DTOs. Each surface follows the same layout:
//! `dto.rs` for wire types, `handlers.rs` for the route functions, and
//! `routes.rs` for router assembly. Webhook routes verify provider
//! signatures and take no session; storefront session routes go through the
//! session and CSRF middleware.

pub mod middleware;
pub mod session;
pub mod webhooks;

use std::sync::Arc;

use crate::application::handlers::webhook::{
    ProcessMeridianWebhookHandler, ProcessNovapayWebhookHandler,
};
use crate::config::SecurityConfig;
use crate::domain::security::{CookieCipher, SignedCookie};
use crate::ports::{CsrfTokenStore, SessionStore};

/// Name of the storefront session cookie.
pub const SESSION_COOKIE: &str = "shopcore_session";

/// Shared application state.
///
/// Cloned per request; everything inside is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub csrf_tokens: Arc<dyn CsrfTokenStore>,
    pub novapay_webhook: Arc<ProcessNovapayWebhookHandler>,
    pub meridian_webhook: Arc<ProcessMeridianWebhookHandler>,
    pub cookie_cipher: Arc<CookieCipher>,
    pub signed_cookie: Arc<SignedCookie>,
    pub security: SecurityConfig,
}

impl AppState {
    /// Seals a bearer token into its cookie form: encrypted, then signed.
    pub fn seal_token(&self, token: &str) -> String {
        self.signed_cookie.create(&self.cookie_cipher.encrypt(token))
    }

    /// Reverses [`seal_token`](Self::seal_token). `None` for any forgery,
    /// tampering or garbage; the failure modes are not distinguished.
    pub fn unseal_token(&self, cookie_value: &str) -> Option<String> {
        let envelope = self.signed_cookie.verify(cookie_value)?;
        self.cookie_cipher.decrypt(&envelope)
    }
}

/// Assembles the full application router.
pub fn build_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .nest("/api/session", session::session_routes(state.clone()))
        .nest("/webhooks", webhooks::webhook_routes())
        .with_state(state)
}
