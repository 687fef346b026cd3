//! Crypto primitives for the cookie/session core.
//!
//! Implements AES-256-GCM authenticated encryption of opaque strings and
//! HMAC-SHA256 signing with constant-time verification. Every failure path
//! is collapsed into a single "invalid" signal so callers cannot distinguish
//! a bad tag from malformed input.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// AES-256-GCM cipher for opaque cookie payloads.
///
/// The transport form is a single URL-safe base64 string of
/// `nonce || ciphertext || tag`. A fresh random nonce is drawn per call, so
/// two encryptions of the same plaintext never produce the same envelope.
#[derive(Clone)]
pub struct CookieCipher {
    key: [u8; 32],
}

impl CookieCipher {
    /// Creates a cipher keyed by the configured secret.
    ///
    /// The secret is run through SHA-256 to produce fixed-size key material.
    pub fn new(secret: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        let digest = hasher.finalize();
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Encrypts a plaintext into a transport-safe envelope string.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .expect("AES-GCM encryption is infallible for in-memory payloads");

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        URL_SAFE_NO_PAD.encode(combined)
    }

    /// Decrypts an envelope, failing closed on any corruption.
    ///
    /// Malformed base64, truncated input and tag mismatch all return `None`;
    /// no partial plaintext ever escapes.
    pub fn decrypt(&self, envelope: &str) -> Option<String> {
        let combined = URL_SAFE_NO_PAD.decode(envelope).ok()?;
        if combined.len() < NONCE_LEN + TAG_LEN {
            return None;
        }

        let nonce = Nonce::from_slice(&combined[..NONCE_LEN]);
        let ciphertext = &combined[NONCE_LEN..];

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let plaintext = cipher.decrypt(nonce, ciphertext).ok()?;
        String::from_utf8(plaintext).ok()
    }
}

/// HMAC-SHA256 signer for cookie values.
#[derive(Clone)]
pub struct CookieSigner {
    secret: Vec<u8>,
}

impl CookieSigner {
    /// Creates a signer keyed by the configured secret.
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    /// Computes the deterministic hex-encoded MAC of a value.
    pub fn sign(&self, value: &str) -> String {
        let mut mac =
            <HmacSha256 as Mac>::new_from_slice(&self.secret).expect("HMAC accepts any key size");
        mac.update(value.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verifies a hex-encoded signature over a value.
    ///
    /// Uses constant-time comparison; malformed hex is rejected without
    /// panicking and without a distinguishable error.
    pub fn verify(&self, value: &str, signature: &str) -> bool {
        let Ok(provided) = hex::decode(signature) else {
            return false;
        };

        let mut mac =
            <HmacSha256 as Mac>::new_from_slice(&self.secret).expect("HMAC accepts any key size");
        mac.update(value.as_bytes());
        let expected = mac.finalize().into_bytes();

        constant_time_compare(&expected, &provided)
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// Prevents timing attacks that could leak information about the expected
/// signature.
pub(crate) fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
