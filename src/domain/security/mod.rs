//! Cookie/session/CSRF security core primitives.

mod cookie;
mod crypto;
mod token;

pub use cookie::SignedCookie;
pub use crypto::{CookieCipher, CookieSigner};
pub use token::{generate_token, hash_token, TOKEN_HEX_LEN};

pub(crate) use crypto::constant_time_compare;
