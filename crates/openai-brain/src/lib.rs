//! OpenAI-based brain implementation.
//!
//! This crate provides a [`Brain`] that talks to the OpenAI chat completions
//! API (or any compatible endpoint).
//!
//! # Features
//!
//! - Function tools with `auto`, `required`, `none` or named tool choice
//! - JSON-schema constrained output for structured extraction
//! - Image URLs forwarded as vision content parts
//! - Configurable via environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use openai_brain::OpenAiBrain;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = OpenAiBrain::from_env()?;
//!     // Use the brain...
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::OpenAiBrain;
pub use config::{OpenAiBrainConfig, OpenAiBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, Generation, GenerationRequest};
