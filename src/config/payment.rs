//! Payment provider configuration (NovaPay, Meridian)

use std::net::IpAddr;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration for the two webhook providers.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// NovaPay shared secret (concatenated digest scheme)
    pub novapay_secret: SecretString,

    /// NovaPay published callback IPs (comma-separated)
    #[serde(default)]
    pub novapay_allowed_ips: Option<String>,

    /// Meridian RSA public key, PEM-encoded (SPKI)
    pub meridian_public_key_pem: String,

    /// Meridian published callback IPs (comma-separated)
    #[serde(default)]
    pub meridian_allowed_ips: Option<String>,

    /// Bypass the IP allowlist check (non-production only)
    #[serde(default)]
    pub skip_ip_check: bool,
}

impl PaymentConfig {
    /// Parse an allowlist string into IP addresses.
    fn parse_allowlist(raw: Option<&String>) -> Result<Vec<IpAddr>, ValidationError> {
        let Some(raw) = raw else {
            return Ok(Vec::new());
        };
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<IpAddr>()
                    .map_err(|_| ValidationError::InvalidAllowlistEntry(s.to_string()))
            })
            .collect()
    }

    /// NovaPay allowlist as parsed addresses.
    pub fn novapay_allowlist(&self) -> Result<Vec<IpAddr>, ValidationError> {
        Self::parse_allowlist(self.novapay_allowed_ips.as_ref())
    }

    /// Meridian allowlist as parsed addresses.
    pub fn meridian_allowlist(&self) -> Result<Vec<IpAddr>, ValidationError> {
        Self::parse_allowlist(self.meridian_allowed_ips.as_ref())
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.novapay_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("NOVAPAY_SECRET"));
        }
        if self.meridian_public_key_pem.is_empty() {
            return Err(ValidationError::MissingRequired("MERIDIAN_PUBLIC_KEY_PEM"));
        }
        if !self.meridian_public_key_pem.contains("BEGIN PUBLIC KEY") {
            return Err(ValidationError::InvalidMeridianPublicKey);
        }
        self.novapay_allowlist()?;
        self.meridian_allowlist()?;
        Ok(())
    }
}
