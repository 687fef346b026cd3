//! Domain layer. Pure business logic with no I/O.

pub mod foundation;
pub mod payment;
pub mod security;
