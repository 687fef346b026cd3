//! Session store port.
//!
//! Server-side session records keyed by the SHA-256 hash of the opaque
//! browser token. The two lifecycle operations have asymmetric failure
//! contracts: `create` fails loudly (a visitor who cannot get a session is
//! an incident), `validate` degrades to anonymous (`Ok(None)`) on every
//! failure path so a flaky datastore read never 500s a page view.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, SessionId, Timestamp};

/// A server-side session record.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    /// SHA-256 hex of the browser token. The plaintext exists only in the
    /// cookie.
    pub token_hash: String,
    /// Owning account, once the visitor has one. Anonymous sessions carry
    /// `None`; this subsystem never resolves the id further.
    pub user_id: Option<Uuid>,
    /// Arbitrary session data (cart contents, preferences).
    pub data: Value,
    pub created_at: Timestamp,
    /// Touched on every successful validation.
    pub last_accessed_at: Timestamp,
    pub expires_at: Timestamp,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, session: &Session) -> Result<(), DomainError>;

    /// Look up a live session by token hash.
    ///
    /// Returns `Ok(None)` uniformly for unknown hashes, expired sessions,
    /// and datastore failures (logged by the implementation). Callers treat
    /// `None` as "anonymous visitor" and never see the distinction.
    async fn validate(&self, token_hash: &str) -> Result<Option<Session>, DomainError>;

    /// Revoke a session by token hash. Idempotent.
    async fn revoke(&self, token_hash: &str) -> Result<(), DomainError>;

    /// Push the expiry of a live session forward. Returns the updated
    /// record, or `None` if the session was missing or already expired.
    async fn extend(
        &self,
        token_hash: &str,
        new_expires_at: Timestamp,
    ) -> Result<Option<Session>, DomainError>;

    /// Delete expired sessions. Returns the number removed.
    async fn cleanup_expired(&self) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }
}
