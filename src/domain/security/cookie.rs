//! Signed cookie envelope.
//!
//! Bundles a value and its MAC into one transport string:
//! `base64url(value) + "." + hex(hmac_sha256(secret, value))`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use super::crypto::CookieSigner;

/// Builds and verifies signed cookie values.
#[derive(Clone)]
pub struct SignedCookie {
    signer: CookieSigner,
}

impl SignedCookie {
    pub fn new(signer: CookieSigner) -> Self {
        Self { signer }
    }

    /// Bundles a value and its signature into one transport string.
    pub fn create(&self, value: &str) -> String {
        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(value.as_bytes()),
            self.signer.sign(value)
        )
    }

    /// Parses a cookie, recomputes the signature over the embedded value and
    /// compares. Structural corruption and signature mismatch are logged
    /// differently but both surface to the caller as plain `None`.
    pub fn verify(&self, cookie: &str) -> Option<String> {
        let Some((encoded, signature)) = cookie.rsplit_once('.') else {
            tracing::debug!("signed cookie rejected: missing separator");
            return None;
        };
        let Ok(raw) = URL_SAFE_NO_PAD.decode(encoded) else {
            tracing::debug!("signed cookie rejected: malformed base64");
            return None;
        };
        let Ok(value) = String::from_utf8(raw) else {
            tracing::debug!("signed cookie rejected: non-utf8 value");
            return None;
        };

        if !self.signer.verify(&value, signature) {
            tracing::debug!("signed cookie rejected: signature mismatch");
            return None;
        }

        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar() -> SignedCookie {
        SignedCookie::new(CookieSigner::new("test-cookie-signing-secret-material!"))
    }

    #[test]
    fn create_then_verify_round_trips() {
        let jar = jar();
        let cookie = jar.create("visitor=v_123");
        assert_eq!(jar.verify(&cookie), Some("visitor=v_123".to_string()));
    }

    #[test]
    fn values_containing_dots_survive() {
        let jar = jar();
        let cookie = jar.create("a.b.c=1.2.3");
        assert_eq!(jar.verify(&cookie), Some("a.b.c=1.2.3".to_string()));
    }

    #[test]
    fn tampered_value_is_rejected() {
        let jar = jar();
        let cookie = jar.create("tier=basic");
        let forged = cookie.replacen(
            &URL_SAFE_NO_PAD.encode("tier=basic"),
            &URL_SAFE_NO_PAD.encode("tier=gold"),
            1,
        );
        assert!(jar.verify(&forged).is_none());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let jar = jar();
        let mut cookie = jar.create("value");
        cookie.pop();
        cookie.push('f');
        // Either the signature changed or it collides with itself; re-sign check
        if cookie != jar.create("value") {
            assert!(jar.verify(&cookie).is_none());
        }
    }

    #[test]
    fn structurally_malformed_cookie_is_rejected() {
        let jar = jar();
        assert!(jar.verify("no-separator-here").is_none());
        assert!(jar.verify("%%bad%%.deadbeef").is_none());
        assert!(jar.verify("").is_none());
    }

    #[test]
    fn every_single_byte_mutation_is_rejected() {
        let jar = jar();
        let cookie = jar.create("order=42");
        let bytes = cookie.as_bytes();

        for i in 0..bytes.len() {
            let mut mutated = bytes.to_vec();
            mutated[i] ^= 0x02;
            if let Ok(s) = String::from_utf8(mutated) {
                if s == cookie {
                    continue;
                }
                assert!(jar.verify(&s).is_none(), "mutation at byte {} accepted", i);
            }
        }
    }
}
