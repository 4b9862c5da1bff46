//! Core trait and types for brain implementations.
//!
//! A brain is the language-model capability used by the nutrition assistant:
//! given a system prompt, a short conversation and a set of declared tools, it
//! returns free text and/or tool invocations. This crate defines:
//!
//! - [`Brain`] - The trait that all brain implementations must implement
//! - [`GenerationRequest`] / [`Generation`] - Input and output of one model call
//! - [`ToolDefinition`] / [`ToolRequest`] / [`ToolResult`] - Tool declaration and invocation types
//! - [`BrainError`] - Error types for brain operations
//! - [`generate_object`] - Helper for structured (JSON schema) output
//!
//! # Example
//!
//! ```rust
//! use brain_core::{Brain, BrainError, Generation, GenerationRequest};
//! use async_trait::async_trait;
//!
//! struct MyBrain;
//!
//! #[async_trait]
//! impl Brain for MyBrain {
//!     async fn generate(&self, _request: GenerationRequest) -> Result<Generation, BrainError> {
//!         Ok(Generation::text("Hola!"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyBrain"
//!     }
//! }
//! ```

mod error;
mod message;
mod prompt;
mod structured;
mod tools;
mod trait_def;

pub use error::BrainError;
pub use message::{ChatMessage, Generation, GenerationRequest, ResponseFormat, Role};
pub use prompt::{hash_prompt, prompt_fingerprint};
pub use structured::{generate_object, parse_object};
pub use tools::{FunctionDefinition, ToolChoice, ToolDefinition, ToolRequest, ToolResult};
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
