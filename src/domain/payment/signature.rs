//! Provider signature schemes.
//!
//! Only the signature layer of the webhook pipeline varies per provider, so
//! the two published schemes live behind one closed enum instead of
//! duplicating the pipeline.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::sha2::Sha256;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha1::{Digest, Sha1};

use crate::domain::security::constant_time_compare;

/// Error constructing a scheme from configured key material.
#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    #[error("invalid RSA public key: {0}")]
    InvalidPublicKey(String),
}

/// The closed set of provider signature schemes.
pub enum SignatureScheme {
    /// NovaPay's dictated scheme: `base64(sha1(secret || payload || secret))`.
    ///
    /// The secret is concatenated on both sides of the payload rather than
    /// used as an HMAC key; that is the provider's published contract, not a
    /// design choice here.
    HmacConcat { secret: String },

    /// Meridian's scheme: RSA-PKCS#1-v1.5 with SHA-256 over the exact raw
    /// body bytes, signature transported as base64.
    Rsa { verifying_key: VerifyingKey<Sha256> },
}

impl SignatureScheme {
    /// Builds the concatenated-digest scheme from a shared secret.
    pub fn hmac_concat(secret: impl Into<String>) -> Self {
        SignatureScheme::HmacConcat {
            secret: secret.into(),
        }
    }

    /// Builds the RSA scheme from a PEM-encoded (SPKI) public key.
    pub fn rsa_from_pem(pem: &str) -> Result<Self, SchemeError> {
        let public_key = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| SchemeError::InvalidPublicKey(e.to_string()))?;
        Ok(SignatureScheme::Rsa {
            verifying_key: VerifyingKey::<Sha256>::new(public_key),
        })
    }

    /// Verifies a signature over the payload bytes.
    ///
    /// Returns `false` for any malformed signature encoding; never panics.
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        match self {
            SignatureScheme::HmacConcat { secret } => {
                let mut hasher = Sha1::new();
                hasher.update(secret.as_bytes());
                hasher.update(payload);
                hasher.update(secret.as_bytes());
                let expected = hasher.finalize();

                let Ok(provided) = BASE64_STANDARD.decode(signature) else {
                    return false;
                };
                constant_time_compare(&expected, &provided)
            }
            SignatureScheme::Rsa { verifying_key } => {
                let Ok(raw) = BASE64_STANDARD.decode(signature) else {
                    return false;
                };
                let Ok(signature) = Signature::try_from(raw.as_slice()) else {
                    return false;
                };
                verifying_key.verify(payload, &signature).is_ok()
            }
        }
    }
}
