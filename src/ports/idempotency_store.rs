//! Webhook idempotency store port.
//!
//! Providers redeliver webhooks on timeouts and 5xx responses, so every
//! delivery carries a provider-scoped idempotency key and the first insert
//! wins. The insert must be atomic in implementations: check-then-insert
//! would let two concurrent deliveries of the same event both proceed.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp};

/// Outcome of attempting to record an idempotency key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// First delivery; processing may proceed.
    Inserted,
    /// Key already recorded; this delivery is a replay.
    AlreadyExists,
}

/// Store port for webhook replay suppression.
#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// Atomically record a key, e.g. `novapay_<transaction_id>`. Exactly
    /// one of any set of concurrent inserts for the same key returns
    /// `Inserted`. The provider name is recorded alongside for audit.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn try_insert(
        &self,
        key: &str,
        provider: &str,
        seen_at: Timestamp,
    ) -> Result<InsertOutcome, DomainError>;

    /// Delete keys older than the retention window. Returns the number
    /// removed.
    async fn cleanup_expired(&self) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotency_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn IdempotencyStore) {}
    }
}
