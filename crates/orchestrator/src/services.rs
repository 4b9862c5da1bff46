//! Collaborators shared by every action in a turn.

use std::sync::Arc;

use brain_core::{Brain, BrainError, Generation, GenerationRequest};
use nutrition_store::{NewMessage, StoreError, User, UserRepository};
use serde::de::DeserializeOwned;
use tokio::time::timeout;
use tracing::warn;

use crate::config::OrchestratorConfig;
use crate::sender::MessageSender;

/// Store, brain and sender, plus the knobs that govern how they are used.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn UserRepository>,
    pub brain: Arc<dyn Brain>,
    pub sender: Arc<dyn MessageSender>,
    pub config: OrchestratorConfig,
}

impl Services {
    pub fn new(
        store: Arc<dyn UserRepository>,
        brain: Arc<dyn Brain>,
        sender: Arc<dyn MessageSender>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            brain,
            sender,
            config,
        }
    }

    /// One model call, bounded by the configured timeout.
    pub async fn generate(&self, request: GenerationRequest) -> Result<Generation, BrainError> {
        match timeout(self.config.llm_timeout, self.brain.generate(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{} did not answer within {:?}",
                    self.brain.name(),
                    self.config.llm_timeout
                );
                Err(BrainError::Timeout)
            }
        }
    }

    /// A structured model call decoded into `T`, bounded by the configured timeout.
    pub async fn generate_object<T: DeserializeOwned>(
        &self,
        request: GenerationRequest,
    ) -> Result<T, BrainError> {
        let call = brain_core::generate_object::<T>(self.brain.as_ref(), request);
        match timeout(self.config.llm_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{} did not answer within {:?}",
                    self.brain.name(),
                    self.config.llm_timeout
                );
                Err(BrainError::Timeout)
            }
        }
    }

    /// Send a message and record it in the conversation.
    ///
    /// Failures are logged and never abort the turn.
    pub async fn reply(&self, phone: &str, text: &str) {
        if let Err(e) = self.sender.send_message(phone, text).await {
            warn!("Failed to send message to {}: {}", phone, e);
        }
        if let Err(e) = self
            .store
            .add_message(phone, NewMessage::from_assistant(text))
            .await
        {
            warn!("Failed to record assistant message for {}: {}", phone, e);
        }
    }

    /// Fresh snapshot of a user.
    pub async fn require_user(&self, phone: &str) -> Result<User, StoreError> {
        self.store
            .get_user(phone)
            .await
            .ok_or_else(|| StoreError::NotFound {
                entity: "user",
                id: phone.to_string(),
            })
    }
}
