//! Deepgram pre-recorded transcription client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DeepgramConfig;
use crate::error::{Result, TranscriptionError};
use crate::transcriber::Transcriber;

#[derive(Debug, Serialize)]
struct ListenRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListenResponse {
    results: ListenResults,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "err_msg")]
    message: Option<String>,
}

impl ListenResponse {
    /// Best transcript of the first channel.
    pub(crate) fn transcript(&self) -> Option<&str> {
        self.results
            .channels
            .first()?
            .alternatives
            .first()
            .map(|alt| alt.transcript.trim())
            .filter(|t| !t.is_empty())
    }
}

/// Transcriber backed by Deepgram's `/v1/listen` endpoint.
pub struct DeepgramTranscriber {
    http: Client,
    config: DeepgramConfig,
}

impl DeepgramTranscriber {
    pub fn new(config: DeepgramConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(TranscriptionError::Config("API key is empty".to_string()));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!("Deepgram transcriber initialized with model: {}", config.model);
        Ok(Self { http, config })
    }

    /// Create a transcriber from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(DeepgramConfig::from_env()?)
    }
}

#[async_trait]
impl Transcriber for DeepgramTranscriber {
    async fn transcribe(&self, media_url: &str) -> Result<String> {
        debug!("Transcribing {}", media_url);

        let response = self
            .http
            .post(self.config.listen_url())
            .header("Authorization", format!("Token {}", self.config.api_key))
            .json(&ListenRequest { url: media_url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let listen: ListenResponse = response.json().await?;
        listen
            .transcript()
            .map(str::to_string)
            .ok_or(TranscriptionError::EmptyTranscript)
    }

    fn name(&self) -> &str {
        "deepgram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            DeepgramTranscriber::new(DeepgramConfig::default()),
            Err(TranscriptionError::Config(_))
        ));
    }

    #[test]
    fn test_parse_transcript() {
        let body = r#"{
            "metadata": {"request_id": "abc"},
            "results": {"channels": [{
                "detected_language": "es",
                "alternatives": [{"transcript": " comí dos empanadas ", "confidence": 0.97}]
            }]}
        }"#;
        let listen: ListenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(listen.transcript(), Some("comí dos empanadas"));
    }

    #[test]
    fn test_blank_transcript_is_none() {
        let body = r#"{"results": {"channels": [{"alternatives": [{"transcript": ""}]}]}}"#;
        let listen: ListenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(listen.transcript(), None);

        let body = r#"{"results": {"channels": []}}"#;
        let listen: ListenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(listen.transcript(), None);
    }
}
