//! Periodic cleanup sweep over the security and idempotency stores.
//!
//! Runs from a background interval task. Best-effort by contract: a failed
//! sweep of one store is logged and does not stop the others, and nothing
//! here ever propagates an error to the caller.

use std::sync::Arc;

use crate::ports::{CsrfTokenStore, IdempotencyStore, SessionStore};

/// Counts of rows removed by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub csrf_tokens: u64,
    pub sessions: u64,
    pub idempotency_keys: u64,
}

pub struct CleanupSweepHandler {
    csrf_tokens: Arc<dyn CsrfTokenStore>,
    sessions: Arc<dyn SessionStore>,
    idempotency: Arc<dyn IdempotencyStore>,
}

impl CleanupSweepHandler {
    pub fn new(
        csrf_tokens: Arc<dyn CsrfTokenStore>,
        sessions: Arc<dyn SessionStore>,
        idempotency: Arc<dyn IdempotencyStore>,
    ) -> Self {
        Self {
            csrf_tokens,
            sessions,
            idempotency,
        }
    }

    pub async fn handle(&self) -> SweepReport {
        let mut report = SweepReport::default();

        match self.csrf_tokens.cleanup_expired().await {
            Ok(n) => report.csrf_tokens = n,
            Err(e) => tracing::error!(error = %e.message, "csrf token sweep failed"),
        }
        match self.sessions.cleanup_expired().await {
            Ok(n) => report.sessions = n,
            Err(e) => tracing::error!(error = %e.message, "session sweep failed"),
        }
        match self.idempotency.cleanup_expired().await {
            Ok(n) => report.idempotency_keys = n,
            Err(e) => tracing::error!(error = %e.message, "idempotency sweep failed"),
        }

        if report != SweepReport::default() {
            tracing::info!(
                csrf_tokens = report.csrf_tokens,
                sessions = report.sessions,
                idempotency_keys = report.idempotency_keys,
                "cleanup sweep removed expired rows"
            );
        }
        report
    }
}
