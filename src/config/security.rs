//! Security configuration (cookie crypto keys, token lifetimes)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Security configuration for the cookie/session/CSRF core.
///
/// Both secrets are required; the crypto primitives are never constructed
/// without them, so a missing key fails startup rather than silently
/// degrading to unsigned cookies.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Key material for AES-256-GCM cookie encryption.
    pub cookie_encryption_key: SecretString,

    /// Secret for HMAC-SHA256 cookie signing.
    pub cookie_signing_secret: SecretString,

    /// CSRF token lifetime in seconds
    #[serde(default = "default_csrf_ttl")]
    pub csrf_ttl_secs: i64,

    /// Session lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,

    /// Webhook idempotency record retention in seconds.
    /// Must exceed the providers' maximum plausible retry window.
    #[serde(default = "default_idempotency_ttl")]
    pub idempotency_ttl_secs: i64,

    /// Cleanup sweep interval in seconds
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

impl SecurityConfig {
    /// Validate security configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cookie_encryption_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("COOKIE_ENCRYPTION_KEY"));
        }
        if self.cookie_encryption_key.expose_secret().len() < 32 {
            return Err(ValidationError::EncryptionKeyTooShort);
        }
        if self.cookie_signing_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("COOKIE_SIGNING_SECRET"));
        }
        if self.cookie_signing_secret.expose_secret().len() < 32 {
            return Err(ValidationError::SigningSecretTooShort);
        }
        if self.csrf_ttl_secs <= 0 || self.session_ttl_secs <= 0 || self.idempotency_ttl_secs <= 0
        {
            return Err(ValidationError::InvalidTokenTtl);
        }
        Ok(())
    }
}

fn default_csrf_ttl() -> i64 {
    3600
}

fn default_session_ttl() -> i64 {
    60 * 60 * 24 * 30
}

fn default_idempotency_ttl() -> i64 {
    3600
}

fn default_cleanup_interval() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(key: &str, secret: &str) -> SecurityConfig {
        SecurityConfig {
            cookie_encryption_key: SecretString::new(key.to_string()),
            cookie_signing_secret: SecretString::new(secret.to_string()),
            csrf_ttl_secs: default_csrf_ttl(),
            session_ttl_secs: default_session_ttl(),
            idempotency_ttl_secs: default_idempotency_ttl(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }

    #[test]
    fn valid_config_passes() {
        let config = config_with(
            "0123456789abcdef0123456789abcdef",
            "fedcba9876543210fedcba9876543210",
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_encryption_key_is_rejected() {
        let config = config_with("", "fedcba9876543210fedcba9876543210");
        assert!(config.validate().is_err());
    }

    #[test]
    fn short_signing_secret_is_rejected() {
        let config = config_with("0123456789abcdef0123456789abcdef", "tooshort");
        assert!(matches!(
            config.validate(),
            Err(ValidationError::SigningSecretTooShort)
        ));
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut config = config_with(
            "0123456789abcdef0123456789abcdef",
            "fedcba9876543210fedcba9876543210",
        );
        config.csrf_ttl_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTokenTtl)
        ));
    }
}
