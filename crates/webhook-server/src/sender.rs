//! Outbound messages through 2Chat.

use async_trait::async_trait;
use orchestrator::{MessageSender, OrchestratorError};
use tracing::debug;
use twochat::{SendMessagePayload, TwoChatClient};

/// [`MessageSender`] that delivers through the 2Chat API from our number.
pub struct TwoChatSender {
    client: TwoChatClient,
}

impl TwoChatSender {
    pub fn new(client: TwoChatClient) -> Self {
        Self { client }
    }

    async fn deliver(&self, payload: SendMessagePayload) -> Result<(), OrchestratorError> {
        let result = self
            .client
            .send_message(&payload)
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;
        debug!(
            "Delivered to {} (uuid: {:?})",
            payload.to_number, result.message_uuid
        );
        Ok(())
    }
}

#[async_trait]
impl MessageSender for TwoChatSender {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        self.deliver(SendMessagePayload::text(
            self.client.phone_number(),
            recipient,
            text,
        ))
        .await
    }

    async fn send_media(
        &self,
        recipient: &str,
        text: &str,
        media_url: &str,
    ) -> Result<(), OrchestratorError> {
        self.deliver(
            SendMessagePayload::text(self.client.phone_number(), recipient, text)
                .with_media(media_url),
        )
        .await
    }
}
