//! Wire types for the provider webhook endpoints.

use serde::{Deserialize, Serialize};

/// NovaPay posts `application/x-www-form-urlencoded` with these two fields.
#[derive(Debug, Deserialize)]
pub struct NovapayWebhookForm {
    /// Base64 JSON blob, signed as transmitted.
    pub data: String,
    /// `base64(sha1(secret || data || secret))`.
    pub signature: Option<String>,
}

/// Acknowledgement NovaPay expects on success.
#[derive(Debug, Serialize)]
pub struct NovapayAckResponse {
    pub status: &'static str,
}

impl NovapayAckResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Acknowledgement Meridian expects on success.
#[derive(Debug, Serialize)]
pub struct MeridianAckResponse {
    pub received: bool,
}

/// Generic error body. Never carries internal detail.
#[derive(Debug, Serialize)]
pub struct WebhookErrorResponse {
    pub error: &'static str,
}
