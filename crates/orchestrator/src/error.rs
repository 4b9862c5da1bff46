//! Error types for orchestrator operations.

use brain_core::BrainError;
use nutrition_store::StoreError;
use thiserror::Error;

/// Errors that can occur while processing a turn.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Store operation failed (validation or missing record).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Brain processing failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Confirmation was requested but the user has nothing pending.
    #[error("no pending food log entry")]
    NoPendingEntry,

    /// The extraction model found no food in the message.
    #[error("no food could be identified")]
    ExtractionAmbiguous,

    /// The model issued a tool call we cannot decode.
    #[error("invalid tool call: {0}")]
    InvalidToolCall(String),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl OrchestratorError {
    /// Whether the error is a missing user or food log.
    pub fn is_not_found(&self) -> bool {
        matches!(self, OrchestratorError::Store(e) if e.is_not_found())
    }
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
