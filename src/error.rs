//! Failure taxonomy for the request pipeline.
//!
//! Retries are exhausted before anything here is constructed; classification
//! is pure translation from a transport failure to a stable user-facing
//! message.

use thiserror::Error;

/// A failed chat request, as shown to the user.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Server answered with an error status after all retries.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Could not reach the server at all.
    #[error("Connection error. Please check if the Ollama server is running.")]
    Connection,

    /// Per-attempt deadline exceeded repeatedly.
    #[error("The request timed out. Please try again later.")]
    Timeout,

    /// Any other transport-layer fault.
    #[error("An unexpected error occurred.")]
    Request,
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        // Connect failures win over timeouts: a connect-timeout means the
        // server was unreachable, not slow to answer.
        if err.is_connect() {
            ChatError::Connection
        } else if err.is_timeout() {
            ChatError::Timeout
        } else {
            ChatError::Request
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_message_carries_detail() {
        let err = ChatError::Http("503 Service Unavailable".to_string());
        assert_eq!(err.to_string(), "HTTP error: 503 Service Unavailable");
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            ChatError::Connection.to_string(),
            "Connection error. Please check if the Ollama server is running."
        );
        assert_eq!(
            ChatError::Timeout.to_string(),
            "The request timed out. Please try again later."
        );
        assert_eq!(
            ChatError::Request.to_string(),
            "An unexpected error occurred."
        );
    }
}
