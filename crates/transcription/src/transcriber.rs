//! The transcription seam and its test doubles.

use async_trait::async_trait;

use crate::error::{Result, TranscriptionError};

/// Turns a hosted audio file into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio at `media_url`.
    async fn transcribe(&self, media_url: &str) -> Result<String>;

    /// Name of this transcriber, for logging.
    fn name(&self) -> &str;
}

/// Always returns the same transcript.
#[derive(Debug, Clone)]
pub struct StaticTranscriber {
    text: String,
}

impl StaticTranscriber {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl Transcriber for StaticTranscriber {
    async fn transcribe(&self, _media_url: &str) -> Result<String> {
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Always fails.
#[derive(Debug, Clone, Default)]
pub struct FailingTranscriber;

#[async_trait]
impl Transcriber for FailingTranscriber {
    async fn transcribe(&self, _media_url: &str) -> Result<String> {
        Err(TranscriptionError::Api {
            status: 503,
            message: "transcription unavailable".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}
