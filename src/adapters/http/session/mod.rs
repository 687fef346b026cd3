//! Storefront session endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::session_routes;
