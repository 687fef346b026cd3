//! Random bearer tokens and their one-way hashes.
//!
//! CSRF and session tokens share the same randomness contract: 32 bytes
//! from the OS RNG, hex-encoded to a fixed 64 characters. Session tokens
//! are persisted only as SHA-256 hashes so a datastore compromise never
//! yields usable bearer tokens.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Length of a generated token in hex characters.
pub const TOKEN_HEX_LEN: usize = 64;

/// Generates a cryptographically random, fixed-length hex token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// One-way hash of a bearer token, hex-encoded.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn tokens_have_fixed_length() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_HEX_LEN);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique_across_large_sample() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(generate_token()), "token collision");
        }
    }

    #[test]
    fn hash_differs_from_token() {
        let token = generate_token();
        assert_ne!(hash_token(&token), token);
    }

    #[test]
    fn hash_is_deterministic() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
    }

    proptest! {
        #[test]
        fn distinct_inputs_hash_distinctly(a in "[a-f0-9]{64}", b in "[a-f0-9]{64}") {
            prop_assume!(a != b);
            prop_assert_ne!(hash_token(&a), hash_token(&b));
        }
    }
}
