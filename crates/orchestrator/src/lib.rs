//! Conversation orchestrator for the nutrition assistant.
//!
//! This crate provides the [`Orchestrator`] type, which turns each inbound
//! chat message into store updates and outbound replies.
//!
//! # Features
//!
//! - Gates everything behind a nine-field profile (onboarding)
//! - Logs food from text, voice-note transcripts and photos as pending entries
//! - Confirms, corrects and reports on logged food through model tool calls
//! - Sends a short insight after each confirmation, in the background
//! - Serializes turns per phone number; different phones run concurrently
//!
//! # Architecture
//!
//! ```text
//! InboundEnvelope (from the webhook normalizer)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Acquire the per-phone turn lock                         │
//! │         ↓                                                   │
//! │  2. Load or create the user, append the message             │
//! │     • new user → send intro, done                           │
//! │         ↓                                                   │
//! │  3. Take the 5-minute conversation window                   │
//! │         ↓                                                   │
//! │  4. Profile incomplete → onboarding (one tool, required)    │
//! │     • request_missing_information / save_profile_data       │
//! │     Profile complete → food logging (tool loop, auto)       │
//! │     • new / correct / confirm entry, generate_report        │
//! │         ↓                                                   │
//! │  5. Insight tasks keep running on the background set        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nutrition_store::UserStore;
//! use openai_brain::OpenAiBrain;
//! use orchestrator::{LoggingSender, Orchestrator, OrchestratorConfig};
//! use twochat::InboundEnvelope;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = Orchestrator::with_config(
//!         Arc::new(UserStore::new()),
//!         Arc::new(OpenAiBrain::from_env()?),
//!         Arc::new(LoggingSender),
//!         OrchestratorConfig::from_env()?,
//!     );
//!
//!     let envelope = InboundEnvelope::text("+5491187654321", "Hola");
//!     let report = orchestrator.process(envelope).await?;
//!     println!("Stage: {:?}", report.stage);
//!
//!     orchestrator.wait_idle().await;
//!     Ok(())
//! }
//! ```

mod actions;
mod config;
mod context;
mod drafts;
mod error;
mod history;
mod orchestrator;
mod sender;
mod services;
mod tasks;

pub mod food_logging;
pub mod insight;
pub mod messages;
pub mod onboarding;
pub mod prompts;
pub mod report;
pub mod tools;

pub use actions::{ActionKind, ActionOutcome, ActionResult, ReportRange, ToolCall};
pub use config::{OrchestratorConfig, OrchestratorConfigBuilder};
pub use context::{GuardDecision, TurnContext, END_OF_FLOW_RESULT};
pub use drafts::{ExtractedFood, FoodLogDraft, Narrative, ProfileDraft};
pub use error::{OrchestratorError, Result};
pub use orchestrator::{Orchestrator, TurnLocks, TurnReport, TurnStage};
pub use sender::{LoggingSender, MessageSender, NoOpSender, RecordingSender, SentMessage};
pub use services::Services;
pub use tasks::BackgroundTasks;

// Re-export for convenience
pub use async_trait::async_trait;
pub use history::{chat_history, render_conversation};
