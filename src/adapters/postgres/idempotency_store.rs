//! PostgreSQL implementation of IdempotencyStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::{IdempotencyStore, InsertOutcome};

#[derive(Clone)]
pub struct PostgresIdempotencyStore {
    pool: PgPool,
    /// Keys older than this are safe to drop. Must exceed the providers'
    /// maximum plausible retry window.
    retention_secs: i64,
}

impl PostgresIdempotencyStore {
    pub fn new(pool: PgPool, retention_secs: i64) -> Self {
        Self {
            pool,
            retention_secs,
        }
    }
}

#[async_trait]
impl IdempotencyStore for PostgresIdempotencyStore {
    async fn try_insert(
        &self,
        key: &str,
        provider: &str,
        seen_at: Timestamp,
    ) -> Result<InsertOutcome, DomainError> {
        // ON CONFLICT DO NOTHING makes the primary key the arbiter: of any
        // set of concurrent inserts exactly one affects a row.
        let result = sqlx::query(
            r#"
            INSERT INTO webhook_idempotency (key, provider, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(provider)
        .bind(seen_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to record idempotency key: {}", e),
            )
        })?;

        if result.rows_affected() == 1 {
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::AlreadyExists)
        }
    }

    async fn cleanup_expired(&self) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM webhook_idempotency
            WHERE created_at <= NOW() - make_interval(secs => $1)
            "#,
        )
        .bind(self.retention_secs as f64)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to clean up idempotency keys: {}", e),
            )
        })?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn retention_follows_configured_ttl() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/shopcore")
            .unwrap();
        let store = PostgresIdempotencyStore::new(pool, 7200);
        assert_eq!(store.retention_secs, 7200);
    }
}
