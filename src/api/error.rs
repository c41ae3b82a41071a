/// Error types for calls against the management API
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Network(String),

    /// The API answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Status {
        status: u16,
        /// Human-readable description pulled from the error body
        message: String,
    },

    /// The response body was not the JSON we expected
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Description suitable for showing to an operator.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
