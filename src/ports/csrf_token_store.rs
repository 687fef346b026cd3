//! CSRF token store port.
//!
//! One-shot anti-forgery tokens: issued per form render, consumed exactly
//! once on submit. The consume operation is the security boundary and must
//! be atomic in implementations, so that two concurrent submits carrying the
//! same token cannot both pass.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId, Timestamp};

/// A stored CSRF token, keyed by the hash of its value.
#[derive(Debug, Clone)]
pub struct CsrfToken {
    /// SHA-256 hex of the token value. The plaintext never reaches storage.
    pub token_hash: String,
    /// Session the token was issued to. A token is only valid when presented
    /// by the same session.
    pub session_id: SessionId,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Store port for one-shot CSRF tokens.
#[async_trait]
pub trait CsrfTokenStore: Send + Sync {
    /// Persist a freshly issued token. Upserts on the hash so a re-render
    /// of the same form replaces rather than duplicates.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn store(&self, token: &CsrfToken) -> Result<(), DomainError>;

    /// Atomically consume a token: valid only if it exists, belongs to the
    /// presenting session, is unexpired, and has not been consumed before.
    /// Exactly one of any set of concurrent calls for the same token may
    /// return `true`.
    ///
    /// Failure reasons are not distinguished to the caller.
    async fn validate_and_consume(
        &self,
        token_hash: &str,
        session_id: &SessionId,
    ) -> Result<bool, DomainError>;

    /// Delete expired and consumed tokens. Returns the number removed.
    async fn cleanup_expired(&self) -> Result<u64, DomainError>;
}
