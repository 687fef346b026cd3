//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx implementations of the persistence ports
//! - `email` - Resend order notifications
//! - `http` - Axum routers, handlers and middleware

pub mod email;
pub mod http;
pub mod postgres;
