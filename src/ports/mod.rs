//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Security Ports
//!
//! - `CsrfTokenStore` - One-shot anti-forgery token persistence
//! - `SessionStore` - Server-side session records
//!
//! ## Payment Ports
//!
//! - `IdempotencyStore` - Webhook replay suppression
//! - `OrderStore` - Payment-status reads and writes on orders
//! - `OrderNotifier` - Post-payment customer notification

mod csrf_token_store;
mod idempotency_store;
mod order_notifier;
mod order_store;
mod session_store;

pub use csrf_token_store::{CsrfToken, CsrfTokenStore};
pub use idempotency_store::{IdempotencyStore, InsertOutcome};
pub use order_notifier::OrderNotifier;
pub use order_store::{OrderConfirmation, OrderLine, OrderStore};
pub use session_store::{Session, SessionStore};
