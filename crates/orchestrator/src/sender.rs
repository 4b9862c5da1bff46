//! Message sender trait and implementations.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::OrchestratorError;

/// Trait for delivering outbound chat messages.
///
/// Abstracted to support different transports (2Chat, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message.
    ///
    /// # Arguments
    /// * `recipient` - Phone number of the user
    /// * `text` - Message content
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError>;

    /// Send a message with an attached media URL.
    ///
    /// # Arguments
    /// * `recipient` - Phone number of the user
    /// * `text` - Caption
    /// * `media_url` - Publicly reachable URL of the file
    ///
    /// Default implementation drops the media and sends the caption.
    async fn send_media(
        &self,
        recipient: &str,
        text: &str,
        _media_url: &str,
    ) -> Result<(), OrchestratorError> {
        self.send_message(recipient, text).await
    }
}

/// A no-op message sender for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send_message(&self, _recipient: &str, _text: &str) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        tracing::info!("[SEND] to={}: {}", recipient, text);
        Ok(())
    }

    async fn send_media(
        &self,
        recipient: &str,
        text: &str,
        media_url: &str,
    ) -> Result<(), OrchestratorError> {
        tracing::info!("[SEND] to={} media={}: {}", recipient, media_url, text);
        Ok(())
    }
}

/// A message delivered through [`RecordingSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub text: String,
    pub media_url: Option<String>,
}

/// A sender that keeps every message in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.lock().clone()
    }

    /// Texts sent so far, in order.
    pub fn texts(&self) -> Vec<String> {
        self.lock().iter().map(|m| m.text.clone()).collect()
    }

    /// Texts sent to one recipient.
    pub fn texts_to(&self, recipient: &str) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|m| m.recipient == recipient)
            .map(|m| m.text.clone())
            .collect()
    }

    /// Whether any sent text contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|m| m.text.contains(needle))
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SentMessage>> {
        self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, recipient: &str, text: &str, media_url: Option<&str>) {
        self.lock().push(SentMessage {
            recipient: recipient.to_string(),
            text: text.to_string(),
            media_url: media_url.map(str::to_string),
        });
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        self.record(recipient, text, None);
        Ok(())
    }

    async fn send_media(
        &self,
        recipient: &str,
        text: &str,
        media_url: &str,
    ) -> Result<(), OrchestratorError> {
        self.record(recipient, text, Some(media_url));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_sender() {
        let sender = RecordingSender::new();
        sender.send_message("+1", "hola").await.unwrap();
        sender.send_media("+2", "foto", "https://cdn/1.jpg").await.unwrap();

        assert_eq!(sender.texts(), vec!["hola", "foto"]);
        assert_eq!(sender.texts_to("+2"), vec!["foto"]);
        assert_eq!(sender.sent()[1].media_url.as_deref(), Some("https://cdn/1.jpg"));
        assert!(sender.contains("ol"));

        sender.clear();
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_default_media_falls_back_to_text() {
        struct TextOnly(RecordingSender);

        #[async_trait]
        impl MessageSender for TextOnly {
            async fn send_message(
                &self,
                recipient: &str,
                text: &str,
            ) -> Result<(), OrchestratorError> {
                self.0.send_message(recipient, text).await
            }
        }

        let sender = TextOnly(RecordingSender::new());
        sender.send_media("+1", "foto", "https://cdn/1.jpg").await.unwrap();
        assert_eq!(sender.0.sent()[0].media_url, None);
    }
}
