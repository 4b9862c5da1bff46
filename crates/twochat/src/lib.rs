//! 2Chat WhatsApp API client library.
//!
//! This crate provides a Rust client for the 2Chat open API and the
//! normalizer for its webhooks. It supports:
//!
//! - Sending text and media messages from the configured number
//! - Managing webhook subscriptions and listing connected numbers
//! - Turning `message.received` webhooks into [`InboundEnvelope`]s,
//!   transcribing voice notes on the way
//!
//! # Example
//!
//! ```no_run
//! use twochat::{TwoChatClient, TwoChatConfig};
//!
//! # async fn example() -> Result<(), twochat::TwoChatError> {
//! let client = TwoChatClient::new(TwoChatConfig::new("api-key", "+5491100000000"))?;
//! let result = client.send_text("+5491187654321", "¡Hola!").await?;
//! println!("Sent: {:?}", result.message_uuid);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::TwoChatClient;
pub use config::TwoChatConfig;
pub use error::{Result, TwoChatError};
pub use normalize::{
    is_receipt_event, normalize, parse_timestamp, EnvelopeContent, EnvelopeMedia, InboundEnvelope,
    InboundEvent, MessageKind, SenderInfo, TRANSCRIPTION_FAILED_TEXT,
};
pub use types::*;
