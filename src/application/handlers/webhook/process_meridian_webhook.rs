//! ProcessMeridianWebhookHandler - Command handler for Meridian callbacks.
//!
//! Meridian posts a JSON body and signs the exact raw bytes with
//! RSA-PKCS#1-v1.5/SHA-256, transporting the base64 signature in the
//! `X-Meridian-Signature` header. Verification runs over the bytes as
//! received; the body is parsed only afterwards.

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::foundation::{OrderId, Timestamp};
use crate::domain::payment::{map_provider_status, WebhookError, WebhookGate};
use crate::ports::{IdempotencyStore, InsertOutcome, OrderNotifier, OrderStore};

use super::{apply_status_and_notify, store_error, WebhookOutcome};

/// Command to process one Meridian delivery.
#[derive(Debug, Clone)]
pub struct ProcessMeridianWebhookCommand {
    pub source_ip: std::net::IpAddr,
    /// Raw request body, untouched.
    pub body: Vec<u8>,
    /// The `X-Meridian-Signature` header value, if present.
    pub signature: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeridianPayload {
    invoice_id: Option<String>,
    transaction_id: Option<String>,
    order_id: Option<String>,
    #[serde(default)]
    status: String,
    /// Unix seconds at which the provider created the event.
    created_at: Option<i64>,
}

pub struct ProcessMeridianWebhookHandler {
    gate: WebhookGate,
    idempotency: Arc<dyn IdempotencyStore>,
    orders: Arc<dyn OrderStore>,
    notifier: Arc<dyn OrderNotifier>,
}

impl ProcessMeridianWebhookHandler {
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
        cmd: ProcessMeridianWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        self.gate.check_source_ip(cmd.source_ip)?;
        self.gate
            .verify_signature(&cmd.body, cmd.signature.as_deref())?;

        let payload: MeridianPayload = serde_json::from_slice(&cmd.body)
            .map_err(|e| WebhookError::MalformedPayload(format!("body is not JSON: {e}")))?;

        // invoice_id first, transaction_id as the documented fallback.
        let reference = payload
            .invoice_id
            .as_deref()
            .or(payload.transaction_id.as_deref())
            .ok_or(WebhookError::MissingTransactionReference)?;
        let key = format!("meridian_{reference}");
        match self
            .idempotency
            .try_insert(&key, "meridian", Timestamp::now())
            .await
            .map_err(store_error)?
        {
            InsertOutcome::Inserted => {}
            InsertOutcome::AlreadyExists => return Err(WebhookError::Duplicate),
        }

        self.gate.check_freshness(payload.created_at)?;

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
            "meridian webhook applied"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::webhook::test_support::*;
    use crate::domain::payment::{PaymentStatus, SignatureScheme};

    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
    use base64::Engine as _;
    use rsa::pkcs1v15::SigningKey;
    use rsa::pkcs8::EncodePublicKey;
    use rsa::sha2::Sha256;
    use rsa::signature::{SignatureEncoding, Signer};
    use rsa::RsaPrivateKey;

    struct Fixture {
        handler: ProcessMeridianWebhookHandler,
        signing_key: SigningKey<Sha256>,
        notifier: Arc<MockNotifier>,
        order_id: OrderId,
    }

    fn fixture() -> Fixture {
        let private_key =
            RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).expect("test key generation");
        let pem = private_key
            .to_public_key()
            .to_public_key_pem(Default::default())
            .expect("test key encoding");
        let signing_key = SigningKey::<Sha256>::new(private_key);

        let order_id = OrderId::new();
        let notifier = Arc::new(MockNotifier::default());
        let handler = ProcessMeridianWebhookHandler::new(
            WebhookGate::new(vec![], true, SignatureScheme::rsa_from_pem(&pem).unwrap()),
            Arc::new(MockIdempotencyStore::default()),
            Arc::new(MockOrderStore::with_order(&order_id, PaymentStatus::Pending)),
            notifier.clone(),
        );
        Fixture {
            handler,
            signing_key,
            notifier,
            order_id,
        }
    }

    fn signed_command(fx: &Fixture, body: Vec<u8>) -> ProcessMeridianWebhookCommand {
        let signature = BASE64_STANDARD.encode(fx.signing_key.sign(&body).to_bytes());
        ProcessMeridianWebhookCommand {
            source_ip: "203.0.113.20".parse().unwrap(),
            body,
            signature: Some(signature),
        }
    }

    fn body_for(fx: &Fixture, status: &str, invoice: &str) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "invoice_id": invoice,
            "order_id": fx.order_id.to_string(),
            "status": status,
            "created_at": chrono::Utc::now().timestamp(),
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn success_delivery_marks_order_paid_and_notifies() {
        let fx = fixture();
        let cmd = signed_command(&fx, body_for(&fx, "success", "inv_1"));

        let outcome = fx.handler.handle(cmd).await.unwrap();
        assert_eq!(outcome.status, PaymentStatus::Paid);
        assert_eq!(fx.notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn replayed_invoice_is_rejected() {
        let fx = fixture();
        fx.handler
            .handle(signed_command(&fx, body_for(&fx, "success", "inv_2")))
            .await
            .unwrap();

        let result = fx
            .handler
            .handle(signed_command(&fx, body_for(&fx, "success", "inv_2")))
            .await;
        assert!(matches!(result, Err(WebhookError::Duplicate)));
    }

    #[tokio::test]
    async fn tampered_body_fails_signature_verification() {
        let fx = fixture();
        let mut cmd = signed_command(&fx, body_for(&fx, "failure", "inv_3"));
        cmd.body = body_for(&fx, "success", "inv_3");

        assert!(matches!(
            fx.handler.handle(cmd).await,
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let fx = fixture();
        let mut cmd = signed_command(&fx, body_for(&fx, "success", "inv_4"));
        cmd.signature = None;
        assert!(matches!(
            fx.handler.handle(cmd).await,
            Err(WebhookError::MissingSignature)
        ));
    }

    #[tokio::test]
    async fn transaction_id_is_the_fallback_reference() {
        let fx = fixture();
        let body = serde_json::to_vec(&serde_json::json!({
            "transaction_id": "txn_77",
            "order_id": fx.order_id.to_string(),
            "status": "reversed",
        }))
        .unwrap();

        let outcome = fx.handler.handle(signed_command(&fx, body)).await.unwrap();
        assert_eq!(outcome.status, PaymentStatus::Refunded);
    }

    #[tokio::test]
    async fn missing_order_reference_is_rejected() {
        let fx = fixture();
        let body = serde_json::to_vec(&serde_json::json!({
            "invoice_id": "inv_5",
            "status": "success",
        }))
        .unwrap();
        assert!(matches!(
            fx.handler.handle(signed_command(&fx, body)).await,
            Err(WebhookError::MissingOrderReference)
        ));
    }
}
