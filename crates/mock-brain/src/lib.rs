//! Mock brain implementations for the nutrition assistant.
//!
//! This crate provides mock implementations of the `Brain` trait for testing:
//! - `ScriptedBrain` - Replays queued generations and records requests
//! - `EchoBrain` - Echoes the last user message back as text
//! - `DelayedBrain` - Wraps another brain with artificial delay
//!
//! For production use, see the `openai-brain` crate.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, GenerationRequest, ScriptedBrain};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = ScriptedBrain::new()
//!         .then_tool_call("food_log_entry_confirmation", json!({}));
//!
//!     let generation = brain.generate(GenerationRequest::new("system")).await?;
//!     assert_eq!(generation.tool_calls[0].name, "food_log_entry_confirmation");
//!     Ok(())
//! }
//! ```

// Mock implementations
mod delayed;
mod echo;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, Generation, GenerationRequest, ToolRequest};

// Export mock implementations
pub use delayed::DelayedBrain;
pub use echo::EchoBrain;
pub use scripted::ScriptedBrain;
