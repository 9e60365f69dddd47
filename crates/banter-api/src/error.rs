//! Error types for banter-api

use thiserror::Error;

/// Result type alias using banter-api Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the completion endpoint.
///
/// These never escape [`crate::CompletionClient::complete`]; they are folded
/// into [`crate::CompletionOutcome::Failure`] at that boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// JSON body could not be decoded
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint answered with a non-success status
    #[error("HTTP {status}")]
    Status { status: u16 },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Message shown to the user for this error.
    ///
    /// Falls back to a generic message when the underlying error renders empty.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "Unexpected error".to_string()
        } else {
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        assert_eq!(Error::Status { status: 502 }.user_message(), "HTTP 502");
    }

    #[test]
    fn test_json_error_keeps_parser_message() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        let msg = err.user_message();
        assert!(msg.contains("key must be a string"), "got: {}", msg);
    }

    #[test]
    fn test_invalid_config_message() {
        let e = Error::InvalidConfig("base URL is empty".into());
        assert_eq!(e.user_message(), "Invalid configuration: base URL is empty");
    }
}
