/*
[INPUT]:  Error sources (HTTP, API envelope, serialization, WebSocket)
[OUTPUT]: Structured error types with remote error codes and messages
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use thiserror::Error;

const BODY_PREVIEW_MAX_CHARS: usize = 200;

/// Error codes the exchange returns when a request fails authentication.
const AUTH_ERROR_CODES: &[&str] = &[
    "api-signature-not-valid",
    "api-signature-check-failed",
    "invalid-access-key",
    "login-required",
    "invalid-timestamp",
    "api-key-invalid",
];

/// Main error type for the Huobi adapter
#[derive(Error, Debug)]
pub enum HuobiError {
    /// HTTP request failed before a response body was read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The exchange answered with a non-"ok" status envelope
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Stream is not connected
    #[error("WebSocket not connected")]
    NotConnected,

    /// Gzip frame could not be inflated
    #[error("Failed to decompress frame: {0}")]
    Decompress(#[from] std::io::Error),

    /// Response body was not a JSON envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authenticated call attempted without credentials
    #[error("Credentials are required for authenticated requests")]
    MissingCredentials,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HuobiError {
    /// Create an API error from the envelope's `err-code` and `err-msg`
    pub fn api_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        HuobiError::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Wrap a body that could not be decoded, keeping a short preview
    pub fn invalid_body(body: &str) -> Self {
        let preview: String = body.chars().take(BODY_PREVIEW_MAX_CHARS).collect();
        HuobiError::InvalidResponse(preview)
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        match self {
            HuobiError::MissingCredentials => true,
            HuobiError::Api { code, .. } => AUTH_ERROR_CODES.contains(&code.as_str()),
            _ => false,
        }
    }

    /// Remote error code, if the exchange supplied one
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            HuobiError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Result type alias for Huobi operations
pub type Result<T> = std::result::Result<T, HuobiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_auth_error() {
        assert!(HuobiError::MissingCredentials.is_auth_error());
        assert!(HuobiError::api_error("api-signature-not-valid", "bad sig").is_auth_error());
        assert!(!HuobiError::api_error("order-value-min-error", "too small").is_auth_error());
        assert!(!HuobiError::NotConnected.is_auth_error());
    }

    #[test]
    fn test_api_error_creation() {
        let err = HuobiError::api_error("invalid-parameter", "invalid symbol");
        match &err {
            HuobiError::Api { code, message } => {
                assert_eq!(code, "invalid-parameter");
                assert_eq!(message, "invalid symbol");
            }
            _ => panic!("Expected Api error variant"),
        }
        assert_eq!(err.remote_code(), Some("invalid-parameter"));
        assert_eq!(err.to_string(), "API error (invalid-parameter): invalid symbol");
    }

    #[test]
    fn test_invalid_body_is_truncated() {
        let body = "x".repeat(1000);
        match HuobiError::invalid_body(&body) {
            HuobiError::InvalidResponse(preview) => assert_eq!(preview.len(), 200),
            _ => panic!("Expected InvalidResponse variant"),
        }
    }
}
