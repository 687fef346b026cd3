//! PostgreSQL implementation of CsrfTokenStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::{CsrfToken, CsrfTokenStore};

#[derive(Clone)]
pub struct PostgresCsrfTokenStore {
    pool: PgPool,
}

impl PostgresCsrfTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CsrfTokenStore for PostgresCsrfTokenStore {
    async fn store(&self, token: &CsrfToken) -> Result<(), DomainError> {
        // Upsert: a re-rendered form replaces its previous token row.
        sqlx::query(
            r#"
            INSERT INTO csrf_tokens (token_hash, session_id, issued_at, expires_at, consumed)
            VALUES ($1, $2, $3, $4, FALSE)
            ON CONFLICT (token_hash) DO UPDATE SET
                session_id = EXCLUDED.session_id,
                issued_at = EXCLUDED.issued_at,
                expires_at = EXCLUDED.expires_at,
                consumed = FALSE
            "#,
        )
        .bind(&token.token_hash)
        .bind(token.session_id.as_uuid())
        .bind(token.issued_at.as_datetime())
        .bind(token.expires_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to store csrf token: {}", e),
            )
        })?;

        Ok(())
    }

    async fn validate_and_consume(
        &self,
        token_hash: &str,
        session_id: &SessionId,
    ) -> Result<bool, DomainError> {
        // Single round trip. The WHERE clause is the whole validity check,
        // so concurrent submits race on the row update and only one wins.
        let result = sqlx::query(
            r#"
            UPDATE csrf_tokens
            SET consumed = TRUE
            WHERE token_hash = $1
              AND session_id = $2
              AND consumed = FALSE
              AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .bind(session_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to consume csrf token: {}", e),
            )
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn cleanup_expired(&self) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM csrf_tokens
            WHERE expires_at <= NOW() OR consumed = TRUE
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to clean up csrf tokens: {}", e),
            )
        })?;

        Ok(result.rows_affected())
    }
}
