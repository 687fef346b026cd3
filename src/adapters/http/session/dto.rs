//! Wire types for the session endpoints.

use serde::Serialize;

/// Response to a successful session bootstrap.
#[derive(Debug, Serialize)]
pub struct BootstrapResponse {
    /// Plaintext CSRF token for the first mutating request. Returned once;
    /// only its hash is stored.
    pub csrf_token: String,
    /// RFC 3339 session expiry.
    pub session_expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct IssueCsrfResponse {
    pub csrf_token: String,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct ExtendSessionResponse {
    pub session_expires_at: String,
}

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
