//! Error types for transcription.

use thiserror::Error;

/// Errors that can occur while transcribing audio.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider returned no usable transcript.
    #[error("empty transcript")]
    EmptyTranscript,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for transcription operations.
pub type Result<T> = std::result::Result<T, TranscriptionError>;
