//! Error types for brain operations.

use thiserror::Error;

/// Errors that can occur during brain processing.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The brain is temporarily unavailable.
    #[error("brain unavailable: {0}")]
    Unavailable(String),

    /// The request could not be processed.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The brain has been shut down.
    #[error("brain shut down")]
    ShutDown,

    /// A timeout occurred during processing.
    #[error("processing timed out")]
    Timeout,

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure talking to the model provider.
    #[error("network error: {0}")]
    Network(String),

    /// The model answered, but not in the shape that was asked for.
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}
