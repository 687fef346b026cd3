//! PostgreSQL implementation of OrderStore.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::payment::PaymentStatus;
use crate::ports::{OrderConfirmation, OrderLine, OrderStore};

#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn payment_status(&self, id: &OrderId) -> Result<Option<PaymentStatus>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT payment_status FROM orders WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch order status: {}", e),
            )
        })?;

        match row {
            Some(row) => {
                let raw: String = row.get("payment_status");
                let status = PaymentStatus::parse(&raw).ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Unrecognized stored payment status: {}", raw),
                    )
                })?;
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }

    async fn set_payment_status(
        &self,
        id: &OrderId,
        status: PaymentStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET payment_status = $2, updated_at = NOW() WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update order status: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::OrderNotFound,
                format!("Order not found: {}", id),
            ));
        }

        Ok(())
    }

    async fn confirmation_details(
        &self,
        id: &OrderId,
    ) -> Result<Option<OrderConfirmation>, DomainError> {
        let order = sqlx::query(
            r#"
            SELECT customer_email, customer_name, total_cents, currency
            FROM orders WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch order: {}", e),
            )
        })?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = sqlx::query(
            r#"
            SELECT title, quantity, unit_price_cents
            FROM order_items
            WHERE order_id = $1
            ORDER BY position
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch order items: {}", e),
            )
        })?;

        Ok(Some(OrderConfirmation {
            order_id: *id,
            customer_email: order.get("customer_email"),
            customer_name: order.get("customer_name"),
            total_cents: order.get("total_cents"),
            currency: order.get("currency"),
            lines: lines
                .into_iter()
                .map(|row| OrderLine {
                    title: row.get("title"),
                    quantity: row.get("quantity"),
                    unit_price_cents: row.get("unit_price_cents"),
                })
                .collect(),
        }))
    }
}
