//! Webhook verification gate.
//!
//! Holds the synchronous layers of the four-step pipeline applied to every
//! inbound provider callback: IP allowlist, signature verification and
//! timestamp freshness. The replay/idempotency layer needs the datastore and
//! lives with the orchestrators; the orchestrators run all four in fixed
//! order and fail fast on the first rejection.

use std::net::IpAddr;

use super::errors::WebhookError;
use super::signature::SignatureScheme;

/// Maximum accepted payload age (10 minutes).
pub const FRESHNESS_TOLERANCE_SECS: i64 = 600;

/// Per-provider verification gate.
pub struct WebhookGate {
    allowed_ips: Vec<IpAddr>,
    skip_ip_check: bool,
    scheme: SignatureScheme,
}

impl WebhookGate {
    pub fn new(allowed_ips: Vec<IpAddr>, skip_ip_check: bool, scheme: SignatureScheme) -> Self {
        Self {
            allowed_ips,
            skip_ip_check,
            scheme,
        }
    }

    /// Layer 1: the source IP must appear in the provider's published range.
    ///
    /// An empty allowlist without the bypass flag rejects everything; the
    /// gate fails closed rather than open when the range is unconfigured.
    pub fn check_source_ip(&self, source: IpAddr) -> Result<(), WebhookError> {
        if self.skip_ip_check {
            return Ok(());
        }
        if self.allowed_ips.contains(&source) {
            Ok(())
        } else {
            tracing::warn!(%source, "webhook rejected: source IP not in allowlist");
            Err(WebhookError::UnauthorizedIp)
        }
    }

    /// Layer 2: provider signature over the payload bytes.
    ///
    /// A missing signature is its own rejection, distinct internally from a
    /// failed verification; both stop the pipeline.
    pub fn verify_signature(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<(), WebhookError> {
        let signature = signature.ok_or(WebhookError::MissingSignature)?;
        if self.scheme.verify(payload, signature) {
            Ok(())
        } else {
            Err(WebhookError::InvalidSignature)
        }
    }

    /// Layer 4: payloads carrying a timestamp must be fresh.
    ///
    /// Not every provider event carries a timestamp; absent ones pass.
    pub fn check_freshness(&self, created_at: Option<i64>) -> Result<(), WebhookError> {
        self.check_freshness_at(created_at, chrono::Utc::now().timestamp())
    }

    fn check_freshness_at(&self, created_at: Option<i64>, now: i64) -> Result<(), WebhookError> {
        match created_at {
            Some(ts) if now - ts > FRESHNESS_TOLERANCE_SECS => Err(WebhookError::StaleTimestamp),
            _ => Ok(()),
        }
    }
}
