//! Error types for twochat.

use thiserror::Error;

/// Errors that can occur when talking to 2Chat or reading its webhooks.
#[derive(Debug, Error)]
pub enum TwoChatError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the API.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A webhook payload could not be understood.
    #[error("Invalid payload: {0}")]
    MalformedPayload(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for twochat operations.
pub type Result<T> = std::result::Result<T, TwoChatError>;
