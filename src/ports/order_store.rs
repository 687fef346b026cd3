//! Order store port.
//!
//! The webhook pipeline's view of orders: read the current payment status,
//! write the normalized one, and fetch what the confirmation email needs.
//! Order creation and checkout belong to other surfaces and are not part of
//! this port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::payment::PaymentStatus;

/// An order line as it appears in the confirmation email.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub title: String,
    pub quantity: i32,
    /// Unit price in minor units (cents).
    pub unit_price_cents: i64,
}

/// Everything the confirmation notifier needs about an order.
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub total_cents: i64,
    pub currency: String,
    pub lines: Vec<OrderLine>,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Current payment status of an order, or `None` if the order does not
    /// exist.
    async fn payment_status(&self, id: &OrderId) -> Result<Option<PaymentStatus>, DomainError>;

    /// Write the normalized payment status.
    ///
    /// # Errors
    ///
    /// - `OrderNotFound` if the order does not exist
    /// - `DatabaseError` on persistence failure
    async fn set_payment_status(
        &self,
        id: &OrderId,
        status: PaymentStatus,
    ) -> Result<(), DomainError>;

    /// Fetch the order details the confirmation email renders.
    async fn confirmation_details(
        &self,
        id: &OrderId,
    ) -> Result<Option<OrderConfirmation>, DomainError>;
}
