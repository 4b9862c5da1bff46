//! The Brain trait.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::message::{Generation, GenerationRequest};

/// A language-model capability.
///
/// Implementations must be stateless with respect to conversations: all the
/// context a call needs travels in the [`GenerationRequest`].
#[async_trait]
pub trait Brain: Send + Sync {
    /// Run one model call.
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, BrainError>;

    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Whether the brain can currently accept requests.
    async fn is_ready(&self) -> bool {
        true
    }
}
