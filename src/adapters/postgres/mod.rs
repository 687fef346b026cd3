//! PostgreSQL adapters.
//!
//! sqlx implementations of the persistence ports. The atomic operations the
//! ports require (one-shot CSRF consume, first-wins idempotency insert,
//! validate-and-touch on sessions) are expressed as single SQL statements
//! so the database arbitrates every race.

mod csrf_token_store;
mod idempotency_store;
mod order_store;
mod session_store;

pub use csrf_token_store::PostgresCsrfTokenStore;
pub use idempotency_store::PostgresIdempotencyStore;
pub use order_store::PostgresOrderStore;
pub use session_store::PostgresSessionStore;
