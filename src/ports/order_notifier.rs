//! Order notification port.
//!
//! Fired once per order when payment lands in `paid`. Delivery is
//! best-effort from the webhook handler's point of view: a notification
//! failure is logged and never turns a processed payment into a 5xx, which
//! would trigger a provider retry of an already-applied event.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

use super::order_store::OrderConfirmation;

#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Send the order confirmation to the customer.
    ///
    /// # Errors
    ///
    /// - `NotificationError` on delivery failure
    async fn send_confirmation(&self, order: &OrderConfirmation) -> Result<(), DomainError>;
}
