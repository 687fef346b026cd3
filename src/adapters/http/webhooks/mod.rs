//! Provider webhook endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::MERIDIAN_SIGNATURE_HEADER;
pub use routes::webhook_routes;
