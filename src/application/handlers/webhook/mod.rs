//! Webhook command handlers.
//!
//! One handler per provider. Each runs the four pipeline layers in fixed
//! order (IP allowlist, signature, idempotency, freshness) and fails fast
//! on the first rejection, then normalizes the provider status and applies
//! it to the order. The two handlers share the apply/notify tail.

mod process_meridian_webhook;
mod process_novapay_webhook;

pub use process_meridian_webhook::{ProcessMeridianWebhookCommand, ProcessMeridianWebhookHandler};
pub use process_novapay_webhook::{ProcessNovapayWebhookCommand, ProcessNovapayWebhookHandler};

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::payment::{PaymentStatus, WebhookError};
use crate::ports::{OrderNotifier, OrderStore};

/// Result of a fully processed (non-rejected) webhook.
#[derive(Debug, Clone)]
pub struct WebhookOutcome {
    pub order_id: OrderId,
    pub status: PaymentStatus,
}

fn store_error(e: DomainError) -> WebhookError {
    match e.code {
        ErrorCode::OrderNotFound => WebhookError::OrderNotFound,
        _ => WebhookError::Database(e.message),
    }
}

/// Writes the normalized status and, on a transition into `paid`, sends the
/// confirmation. Notification failures are logged and swallowed; the payment
/// is already applied and a 5xx here would make the provider redeliver an
/// event we have processed.
async fn apply_status_and_notify(
    orders: &Arc<dyn OrderStore>,
    notifier: &Arc<dyn OrderNotifier>,
    order_id: &OrderId,
    status: PaymentStatus,
) -> Result<WebhookOutcome, WebhookError> {
    let previous = orders
        .payment_status(order_id)
        .await
        .map_err(store_error)?
        .ok_or(WebhookError::OrderNotFound)?;

    orders
        .set_payment_status(order_id, status)
        .await
        .map_err(store_error)?;

    if status == PaymentStatus::Paid && previous != PaymentStatus::Paid {
        match orders.confirmation_details(order_id).await {
            Ok(Some(confirmation)) => {
                if let Err(e) = notifier.send_confirmation(&confirmation).await {
                    tracing::warn!(
                        order_id = %order_id,
                        error = %e.message,
                        "order confirmation delivery failed"
                    );
                }
            }
            Ok(None) => {
                tracing::warn!(order_id = %order_id, "order vanished before confirmation send");
            }
            Err(e) => {
                tracing::warn!(
                    order_id = %order_id,
                    error = %e.message,
                    "could not load confirmation details"
                );
            }
        }
    }

    Ok(WebhookOutcome {
        order_id: *order_id,
        status,
    })
}
