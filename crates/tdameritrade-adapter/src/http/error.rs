/*
[INPUT]:  Error sources (transport, API status, JSON, configuration, auth)
[OUTPUT]: Structured error types distinguishing transport, API and parse failures
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the TD Ameritrade adapter
#[derive(Error, Debug)]
pub enum TdAmeritradeError {
    /// Transport failure (connect, TLS, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No usable bearer token in the current options snapshot
    #[error("No access token available, refresh credentials first")]
    MissingToken,

    /// Account field expansion outside of `positions` / `orders`
    #[error("Unsupported account field: {0}")]
    InvalidField(String),

    /// Request parameters rejected before sending
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Capability the client does not provide
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    /// Caller cancelled the in-flight request
    #[error("Request cancelled")]
    Cancelled,
}

impl TdAmeritradeError {
    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        match self {
            TdAmeritradeError::MissingToken => true,
            TdAmeritradeError::Api { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Check if the API reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, TdAmeritradeError::Api { status: 404, .. })
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        TdAmeritradeError::Api {
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Result type alias for TD Ameritrade operations
pub type Result<T> = std::result::Result<T, TdAmeritradeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_auth_error() {
        assert!(TdAmeritradeError::MissingToken.is_auth_error());
        assert!(TdAmeritradeError::api_error(StatusCode::UNAUTHORIZED, "expired").is_auth_error());
        assert!(TdAmeritradeError::api_error(StatusCode::FORBIDDEN, "denied").is_auth_error());
        assert!(!TdAmeritradeError::Cancelled.is_auth_error());
        assert!(!TdAmeritradeError::api_error(StatusCode::BAD_REQUEST, "bad").is_auth_error());
    }

    #[test]
    fn test_error_is_not_found() {
        assert!(TdAmeritradeError::api_error(StatusCode::NOT_FOUND, "missing").is_not_found());
        assert!(!TdAmeritradeError::MissingToken.is_not_found());
    }

    #[test]
    fn test_api_error_creation() {
        let err = TdAmeritradeError::api_error(StatusCode::BAD_REQUEST, "Invalid symbol");
        match err {
            TdAmeritradeError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid symbol");
            }
            _ => panic!("Expected Api error variant"),
        }
    }

    #[test]
    fn test_not_implemented_message() {
        let err = TdAmeritradeError::NotImplemented("forex instruments");
        assert_eq!(err.to_string(), "Not implemented: forex instruments");
    }
}
