//! Voice-note transcription.
//!
//! [`Transcriber`] is the seam used by the webhook normalizer. The production
//! implementation, [`DeepgramTranscriber`], calls Deepgram's pre-recorded
//! `/v1/listen` endpoint with the media URL; [`StaticTranscriber`] and
//! [`FailingTranscriber`] are deterministic doubles for tests.
//!
//! # Example
//!
//! ```no_run
//! use transcription::{DeepgramTranscriber, Transcriber};
//!
//! # async fn example() -> transcription::Result<()> {
//! let transcriber = DeepgramTranscriber::from_env()?;
//! let text = transcriber.transcribe("https://cdn.example.com/voice.ogg").await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod deepgram;
pub mod error;
pub mod transcriber;

pub use config::{DeepgramConfig, DeepgramConfigBuilder};
pub use deepgram::DeepgramTranscriber;
pub use error::{Result, TranscriptionError};
pub use transcriber::{FailingTranscriber, StaticTranscriber, Transcriber};
