//! ProcessNovapayWebhookHandler - Command handler for NovaPay callbacks.
//!
//! NovaPay posts a form with two fields: `data`, a base64 JSON blob, and
//! `signature`, `base64(sha1(secret || data || secret))` over the blob as
//! transmitted. The signature is checked over the raw `data` string before
//! any decoding.

use std::str::FromStr;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use crate::domain::foundation::{OrderId, Timestamp};
use crate::domain::payment::{map_provider_status, WebhookError, WebhookGate};
use crate::ports::{IdempotencyStore, InsertOutcome, OrderNotifier, OrderStore};

use super::{apply_status_and_notify, store_error, WebhookOutcome};

/// Command to process one NovaPay delivery.
#[derive(Debug, Clone)]
pub struct ProcessNovapayWebhookCommand {
    pub source_ip: std::net::IpAddr,
    /// The `data` form field, verbatim.
    pub data: String,
    /// The `signature` form field, if present.
    pub signature: Option<String>,
}

/// Decoded `data` blob. Identifiers are numeric on the wire.
#[derive(Debug, Deserialize)]
struct NovapayPayload {
    order_id: Option<String>,
    #[serde(default)]
    status: String,
    transaction_id: Option<i64>,
    payment_id: Option<i64>,
    /// Unix seconds at which the provider created the event.
    create_date: Option<i64>,
}

pub struct ProcessNovapayWebhookHandler {
    gate: WebhookGate,
    idempotency: Arc<dyn IdempotencyStore>,
    orders: Arc<dyn OrderStore>,
    notifier: Arc<dyn OrderNotifier>,
}

impl ProcessNovapayWebhookHandler {
    pub fn new(
        gate: WebhookGate,
        idempotency: Arc<dyn IdempotencyStore>,
        orders: Arc<dyn OrderStore>,
        notifier: Arc<dyn OrderNotifier>,
    ) -> Self {
        Self {
            gate,
            idempotency,
            orders,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessNovapayWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        // Layer 1: source IP.
        self.gate.check_source_ip(cmd.source_ip)?;

        // Layer 2: signature over the transmitted blob.
        self.gate
            .verify_signature(cmd.data.as_bytes(), cmd.signature.as_deref())?;

        // Decode only after the signature holds.
        let decoded = BASE64_STANDARD
            .decode(&cmd.data)
            .map_err(|e| WebhookError::MalformedPayload(format!("data is not base64: {e}")))?;
        let payload: NovapayPayload = serde_json::from_slice(&decoded)
            .map_err(|e| WebhookError::MalformedPayload(format!("data is not JSON: {e}")))?;

        // Layer 3: replay suppression, transaction_id first, payment_id as
        // the documented fallback.
        let reference = payload
            .transaction_id
            .or(payload.payment_id)
            .ok_or(WebhookError::MissingTransactionReference)?;
        let key = format!("novapay_{reference}");
        match self
            .idempotency
            .try_insert(&key, "novapay", Timestamp::now())
            .await
            .map_err(store_error)?
        {
            InsertOutcome::Inserted => {}
            InsertOutcome::AlreadyExists => return Err(WebhookError::Duplicate),
        }

        // Layer 4: freshness.
        self.gate.check_freshness(payload.create_date)?;

        let order_ref = payload
            .order_id
            .as_deref()
            .ok_or(WebhookError::MissingOrderReference)?;
        let order_id = OrderId::from_str(order_ref).map_err(|_| {
            WebhookError::MalformedPayload("order reference is not a UUID".to_string())
        })?;

        let status = map_provider_status(&payload.status);
        let outcome =
            apply_status_and_notify(&self.orders, &self.notifier, &order_id, status).await?;

        tracing::info!(
            order_id = %outcome.order_id,
            status = %outcome.status,
            idempotency_key = %key,
            "novapay webhook applied"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::webhook::test_support::*;
    use crate::domain::payment::{PaymentStatus, SignatureScheme};
    use sha1::{Digest, Sha1};

    const SECRET: &str = "novapay_test_secret";

    fn encode_blob(json: &serde_json::Value) -> String {
        BASE64_STANDARD.encode(serde_json::to_vec(json).unwrap())
    }

    fn sign_blob(blob: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(SECRET.as_bytes());
        hasher.update(blob.as_bytes());
        hasher.update(SECRET.as_bytes());
        BASE64_STANDARD.encode(hasher.finalize())
    }

    struct Fixture {
        handler: ProcessNovapayWebhookHandler,
        idempotency: Arc<MockIdempotencyStore>,
        orders: Arc<MockOrderStore>,
        notifier: Arc<MockNotifier>,
        order_id: OrderId,
    }

    fn fixture_with(initial: PaymentStatus, notifier_fails: bool) -> Fixture {
        let order_id = OrderId::new();
        let idempotency = Arc::new(MockIdempotencyStore::default());
        let orders = Arc::new(MockOrderStore::with_order(&order_id, initial));
        let notifier = Arc::new(MockNotifier {
            fail: notifier_fails,
            ..Default::default()
        });
        let gate = WebhookGate::new(vec![], true, SignatureScheme::hmac_concat(SECRET));
        let handler = ProcessNovapayWebhookHandler::new(
            gate,
            idempotency.clone(),
            orders.clone(),
            notifier.clone(),
        );
        Fixture {
            handler,
            idempotency,
            orders,
            notifier,
            order_id,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(PaymentStatus::Pending, false)
    }

    fn command_for(fx: &Fixture, status: &str, transaction_id: i64) -> ProcessNovapayWebhookCommand {
        let blob = encode_blob(&serde_json::json!({
            "order_id": fx.order_id.to_string(),
            "status": status,
            "transaction_id": transaction_id,
            "payment_id": transaction_id + 1,
            "create_date": chrono::Utc::now().timestamp(),
        }));
        let signature = sign_blob(&blob);
        ProcessNovapayWebhookCommand {
            source_ip: "203.0.113.10".parse().unwrap(),
            data: blob,
            signature: Some(signature),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Happy Path Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn success_delivery_marks_order_paid_and_notifies_once() {
        let fx = fixture();
        let outcome = fx.handler.handle(command_for(&fx, "success", 7001)).await.unwrap();

        assert_eq!(outcome.status, PaymentStatus::Paid);
        assert_eq!(
            fx.orders.statuses.lock().unwrap()[fx.order_id.as_uuid()],
            PaymentStatus::Paid
        );
        assert_eq!(fx.notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failure_delivery_marks_order_failed_without_notification() {
        let fx = fixture();
        let outcome = fx.handler.handle(command_for(&fx, "failure", 7002)).await.unwrap();

        assert_eq!(outcome.status, PaymentStatus::Failed);
        assert!(fx.notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn already_paid_order_does_not_notify_again() {
        let fx = fixture_with(PaymentStatus::Paid, false);
        fx.handler.handle(command_for(&fx, "success", 7003)).await.unwrap();
        assert!(fx.notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_the_webhook() {
        let fx = fixture_with(PaymentStatus::Pending, true);
        let outcome = fx.handler.handle(command_for(&fx, "success", 7004)).await.unwrap();
        assert_eq!(outcome.status, PaymentStatus::Paid);
    }

    // ══════════════════════════════════════════════════════════════
    // Pipeline Rejection Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn replayed_delivery_is_rejected_and_applies_nothing_twice() {
        let fx = fixture();
        fx.handler.handle(command_for(&fx, "success", 7005)).await.unwrap();

        let result = fx.handler.handle(command_for(&fx, "success", 7005)).await;
        assert!(matches!(result, Err(WebhookError::Duplicate)));
        assert_eq!(fx.notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_before_idempotency() {
        let fx = fixture();
        let mut cmd = command_for(&fx, "success", 7006);
        cmd.signature = Some("AAAA".to_string());

        let result = fx.handler.handle(cmd).await;
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
        // Nothing recorded: a re-send with a good signature must still pass.
        assert!(fx.idempotency.keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_signature_is_rejected() {
        let fx = fixture();
        let mut cmd = command_for(&fx, "success", 7007);
        cmd.signature = None;
        assert!(matches!(
            fx.handler.handle(cmd).await,
            Err(WebhookError::MissingSignature)
        ));
    }

    #[tokio::test]
    async fn unlisted_source_ip_is_rejected() {
        let order_id = OrderId::new();
        let gate = WebhookGate::new(
            vec!["203.0.113.10".parse().unwrap()],
            false,
            SignatureScheme::hmac_concat(SECRET),
        );
        let handler = ProcessNovapayWebhookHandler::new(
            gate,
            Arc::new(MockIdempotencyStore::default()),
            Arc::new(MockOrderStore::with_order(&order_id, PaymentStatus::Pending)),
            Arc::new(MockNotifier::default()),
        );
        let cmd = ProcessNovapayWebhookCommand {
            source_ip: "198.51.100.7".parse().unwrap(),
            data: String::new(),
            signature: None,
        };
        assert!(matches!(
            handler.handle(cmd).await,
            Err(WebhookError::UnauthorizedIp)
        ));
    }

    #[tokio::test]
    async fn stale_timestamp_is_rejected_after_idempotency_recording() {
        let fx = fixture();
        let blob = encode_blob(&serde_json::json!({
            "order_id": fx.order_id.to_string(),
            "status": "success",
            "transaction_id": 7008,
            "create_date": chrono::Utc::now().timestamp() - 3600,
        }));
        let signature = sign_blob(&blob);
        let cmd = ProcessNovapayWebhookCommand {
            source_ip: "203.0.113.10".parse().unwrap(),
            data: blob,
            signature: Some(signature),
        };

        let result = fx.handler.handle(cmd).await;
        assert!(matches!(result, Err(WebhookError::StaleTimestamp)));
        // The key was recorded before the freshness check ran.
        assert!(fx
            .idempotency
            .keys
            .lock()
            .unwrap()
            .contains("novapay_7008"));
    }

    // ══════════════════════════════════════════════════════════════
    // Payload Shape Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn payment_id_is_the_fallback_reference() {
        let fx = fixture();
        let blob = encode_blob(&serde_json::json!({
            "order_id": fx.order_id.to_string(),
            "status": "success",
            "payment_id": 9100,
        }));
        let signature = sign_blob(&blob);
        let cmd = ProcessNovapayWebhookCommand {
            source_ip: "203.0.113.10".parse().unwrap(),
            data: blob,
            signature: Some(signature),
        };

        fx.handler.handle(cmd).await.unwrap();
        assert!(fx.idempotency.keys.lock().unwrap().contains("novapay_9100"));
    }

    #[tokio::test]
    async fn missing_both_references_is_rejected() {
        let fx = fixture();
        let blob = encode_blob(&serde_json::json!({
            "order_id": fx.order_id.to_string(),
            "status": "success",
        }));
        let signature = sign_blob(&blob);
        let cmd = ProcessNovapayWebhookCommand {
            source_ip: "203.0.113.10".parse().unwrap(),
            data: blob,
            signature: Some(signature),
        };
        assert!(matches!(
            fx.handler.handle(cmd).await,
            Err(WebhookError::MissingTransactionReference)
        ));
    }

    #[tokio::test]
    async fn signed_garbage_blob_is_malformed_not_a_signature_failure() {
        let fx = fixture();
        let blob = BASE64_STANDARD.encode(b"not json at all");
        let signature = sign_blob(&blob);
        let cmd = ProcessNovapayWebhookCommand {
            source_ip: "203.0.113.10".parse().unwrap(),
            data: blob,
            signature: Some(signature),
        };
        assert!(matches!(
            fx.handler.handle(cmd).await,
            Err(WebhookError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn unknown_order_is_a_server_side_failure() {
        let fx = fixture();
        let blob = encode_blob(&serde_json::json!({
            "order_id": OrderId::new().to_string(),
            "status": "success",
            "transaction_id": 7010,
        }));
        let signature = sign_blob(&blob);
        let cmd = ProcessNovapayWebhookCommand {
            source_ip: "203.0.113.10".parse().unwrap(),
            data: blob,
            signature: Some(signature),
        };
        assert!(matches!(
            fx.handler.handle(cmd).await,
            Err(WebhookError::OrderNotFound)
        ));
    }
}
