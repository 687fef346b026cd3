//! PostgreSQL implementation of SessionStore.
//!
//! `validate` and `extend` are single conditional UPDATE ... RETURNING
//! statements, so liveness check and touch happen in one round trip and
//! cannot race against the cleanup sweep. Revocation flags the row rather
//! than deleting it; the sweep removes flagged rows later.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp};
use crate::ports::{Session, SessionStore};

#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<Session, DomainError> {
    let map = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to decode session row: {}", e),
        )
    };
    Ok(Session {
        id: SessionId::from_uuid(row.try_get("id").map_err(map)?),
        token_hash: row.try_get("token_hash").map_err(map)?,
        user_id: row.try_get("user_id").map_err(map)?,
        data: row.try_get("data").map_err(map)?,
        created_at: Timestamp::from_datetime(row.try_get("created_at").map_err(map)?),
        last_accessed_at: Timestamp::from_datetime(row.try_get("last_accessed_at").map_err(map)?),
        expires_at: Timestamp::from_datetime(row.try_get("expires_at").map_err(map)?),
    })
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, token_hash, user_id, data, created_at, last_accessed_at, expires_at, revoked
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE)
            "#,
        )
        .bind(session.id.as_uuid())
        .bind(&session.token_hash)
        .bind(session.user_id)
        .bind(&session.data)
        .bind(session.created_at.as_datetime())
        .bind(session.last_accessed_at.as_datetime())
        .bind(session.expires_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert session: {}", e),
            )
        })?;

        Ok(())
    }

    async fn validate(&self, token_hash: &str) -> Result<Option<Session>, DomainError> {
        // Uniform None: unknown hash, expired, revoked and datastore
        // failure are indistinguishable to the caller. A flaky read logs
        // loudly here but renders an anonymous page, not a 500.
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET last_accessed_at = NOW()
            WHERE token_hash = $1
              AND revoked = FALSE
              AND expires_at > NOW()
            RETURNING id, token_hash, user_id, data, created_at, last_accessed_at, expires_at
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => match row_to_session(row) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    tracing::error!(error = %e.message, "session row decode failed");
                    Ok(None)
                }
            },
            Ok(None) => Ok(None),
            Err(e) => {
                tracing::error!(error = %e, "session validation query failed");
                Ok(None)
            }
        }
    }

    async fn revoke(&self, token_hash: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE sessions SET revoked = TRUE WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to revoke session: {}", e),
            )
        })?;

        Ok(())
    }

    async fn extend(
        &self,
        token_hash: &str,
        new_expires_at: Timestamp,
    ) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE sessions
            SET expires_at = $2, last_accessed_at = NOW()
            WHERE token_hash = $1
              AND revoked = FALSE
              AND expires_at > NOW()
            RETURNING id, token_hash, user_id, data, created_at, last_accessed_at, expires_at
            "#,
        )
        .bind(token_hash)
        .bind(new_expires_at.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to extend session: {}", e),
            )
        })?;

        row.map(row_to_session).transpose()
    }

    async fn cleanup_expired(&self) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at <= NOW() OR revoked = TRUE
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to clean up sessions: {}", e),
            )
        })?;

        Ok(result.rows_affected())
    }
}
