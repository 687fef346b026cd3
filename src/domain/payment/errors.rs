//! Webhook error types for payment provider callbacks.
//!
//! Each pipeline layer has its own rejection variant with a fixed HTTP
//! status and a deliberately generic client-facing message. Internal detail
//! (which parse step failed, the database error text) stays server-side.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Source IP is not in the provider's published range.
    #[error("Unauthorized source IP")]
    UnauthorizedIp,

    /// Signature header or form field was absent.
    #[error("Missing signature")]
    MissingSignature,

    /// Signature did not verify over the payload.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Idempotency key already recorded; this delivery is a replay.
    #[error("Duplicate webhook")]
    Duplicate,

    /// Payload timestamp is older than the freshness tolerance.
    #[error("Timestamp too old")]
    StaleTimestamp,

    /// Neither the primary nor the secondary transaction identifier was present.
    #[error("Missing transaction reference")]
    MissingTransactionReference,

    /// The payload carried no order reference.
    #[error("Missing order reference")]
    MissingOrderReference,

    /// Payload could not be decoded or parsed. Detail is for logs only.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Referenced order does not exist.
    #[error("Order not found")]
    OrderNotFound,

    /// Datastore operation failed. Detail is for logs only.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Maps the error to its HTTP status code.
    ///
    /// Status codes drive provider retry behavior: 4xx rejections are final,
    /// 5xx tells the provider to retry (which is safe because of the
    /// idempotency layer).
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::UnauthorizedIp => StatusCode::FORBIDDEN,
            WebhookError::Duplicate => StatusCode::CONFLICT,
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::StaleTimestamp
            | WebhookError::MissingTransactionReference
            | WebhookError::MissingOrderReference
            | WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::OrderNotFound | WebhookError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Generic message safe to return to the caller.
    ///
    /// Rejections within a category are indistinguishable from the outside;
    /// internal parse/database detail never leaves the process.
    pub fn client_message(&self) -> &'static str {
        match self {
            WebhookError::UnauthorizedIp => "unauthorized IP",
            WebhookError::MissingSignature => "missing signature",
            WebhookError::InvalidSignature => "signature verification failed",
            WebhookError::Duplicate => "duplicate webhook",
            WebhookError::StaleTimestamp => "timestamp too old",
            WebhookError::MissingTransactionReference => "missing transaction reference",
            WebhookError::MissingOrderReference => "missing order reference",
            WebhookError::MalformedPayload(_) => "malformed payload",
            WebhookError::OrderNotFound | WebhookError::Database(_) => "handler failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_ip_maps_to_403() {
        assert_eq!(WebhookError::UnauthorizedIp.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn duplicate_maps_to_409() {
        assert_eq!(WebhookError::Duplicate.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn signature_failures_map_to_400() {
        assert_eq!(
            WebhookError::MissingSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::InvalidSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn stale_timestamp_maps_to_400() {
        assert_eq!(
            WebhookError::StaleTimestamp.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn datastore_failures_map_to_500() {
        assert_eq!(
            WebhookError::Database("connection lost".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn client_message_hides_internal_detail() {
        let err = WebhookError::MalformedPayload("expected value at line 1".to_string());
        assert_eq!(err.client_message(), "malformed payload");

        let err = WebhookError::Database("password authentication failed".to_string());
        assert_eq!(err.client_message(), "handler failed");
    }
}
