//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Cookie encryption key must be at least 32 characters")]
    EncryptionKeyTooShort,

    #[error("Cookie signing secret must be at least 32 characters")]
    SigningSecretTooShort,

    #[error("Token TTL must be greater than zero")]
    InvalidTokenTtl,

    #[error("Invalid IP address in allowlist: {0}")]
    InvalidAllowlistEntry(String),

    #[error("Meridian public key is not valid PEM")]
    InvalidMeridianPublicKey,

    #[error("Invalid Resend API key format")]
    InvalidResendKey,

    #[error("Invalid from email address")]
    InvalidFromEmail,
}
