//! Store error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// One or more fields failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl StoreError {
    pub(crate) fn user_not_found(phone: &str) -> Self {
        StoreError::NotFound {
            entity: "user",
            id: phone.to_string(),
        }
    }

    pub(crate) fn food_log_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "food log",
            id: id.to_string(),
        }
    }

    /// Whether this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
