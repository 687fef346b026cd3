//! HTTP middleware.

pub mod csrf;
pub mod session;

pub use csrf::{require_csrf_token, CSRF_HEADER};
pub use session::{session_context, CurrentSession};
