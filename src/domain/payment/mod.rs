//! Payment webhook verification domain.

mod errors;
mod pipeline;
mod signature;
mod status;

pub use errors::WebhookError;
pub use pipeline::{WebhookGate, FRESHNESS_TOLERANCE_SECS};
pub use signature::{SchemeError, SignatureScheme};
pub use status::{map_provider_status, PaymentStatus};
