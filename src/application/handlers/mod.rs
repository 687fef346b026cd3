//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod maintenance;
pub mod webhook;

pub use maintenance::{CleanupSweepHandler, SweepReport};
pub use webhook::{
    ProcessMeridianWebhookCommand, ProcessMeridianWebhookHandler, ProcessNovapayWebhookCommand,
    ProcessNovapayWebhookHandler, WebhookOutcome,
};
