//! Main orchestrator implementation.

use std::sync::Arc;

use brain_core::Brain;
use indexmap::IndexMap;
use nutrition_store::{recent_messages, MediaRef, MessageContent, NewMessage, UserRepository};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info};
use twochat::InboundEnvelope;

use crate::actions::ActionKind;
use crate::config::OrchestratorConfig;
use crate::context::TurnContext;
use crate::error::Result;
use crate::food_logging;
use crate::messages;
use crate::onboarding;
use crate::sender::MessageSender;
use crate::services::Services;
use crate::tasks::BackgroundTasks;

/// Which part of the conversation a turn was handled by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    /// Unknown phone: user created and intro sent.
    FirstContact,
    /// Profile incomplete.
    Onboarding,
    /// Profile complete.
    FoodLogging,
    /// Nothing to act on (empty message from a known user).
    Skipped,
}

/// Summary of a processed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub phone: String,
    pub stage: TurnStage,
    /// Actions that ran, in order.
    pub actions: Vec<ActionKind>,
}

/// Per-phone turn serialization.
///
/// Only phones with a turn running or waiting keep an entry.
#[derive(Default)]
pub struct TurnLocks {
    locks: Mutex<IndexMap<String, Arc<Mutex<()>>>>,
}

impl TurnLocks {
    /// Wait for exclusive use of `phone`. The guard releases it on drop.
    pub async fn acquire(&self, phone: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(phone.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of phones currently tracked.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}

/// The conversation orchestrator.
///
/// Routes each inbound message through onboarding or food logging, with
/// at most one turn in flight per phone number.
pub struct Orchestrator {
    services: Services,
    locks: TurnLocks,
    background: BackgroundTasks,
}

impl Orchestrator {
    /// Create an orchestrator with default configuration.
    pub fn new(
        store: Arc<dyn UserRepository>,
        brain: Arc<dyn Brain>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self::with_config(store, brain, sender, OrchestratorConfig::default())
    }

    /// Create an orchestrator with explicit configuration.
    pub fn with_config(
        store: Arc<dyn UserRepository>,
        brain: Arc<dyn Brain>,
        sender: Arc<dyn MessageSender>,
        config: OrchestratorConfig,
    ) -> Self {
        info!(
            "Orchestrator ready (brain: {}, max steps: {}, llm timeout: {:?})",
            brain.name(),
            config.max_steps,
            config.llm_timeout
        );
        Self {
            services: Services::new(store, brain, sender, config),
            locks: TurnLocks::default(),
            background: BackgroundTasks::new(),
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn store(&self) -> &Arc<dyn UserRepository> {
        &self.services.store
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.services.config
    }

    /// Process an inbound message end-to-end.
    ///
    /// On failure the user gets a generic apology and the error is returned.
    pub async fn process(&self, envelope: InboundEnvelope) -> Result<TurnReport> {
        let phone = envelope.from.trim().to_string();
        info!(
            "Processing message from {} (kind: {:?}, id: {})",
            phone, envelope.kind, envelope.message_id
        );

        let _turn = self.locks.acquire(&phone).await;
        let result = self.run_turn(&phone, &envelope).await;

        if let Err(ref e) = result {
            error!("Turn for {} failed: {}", phone, e);
            self.services.reply(&phone, messages::GENERIC_APOLOGY).await;
        }
        result
    }

    async fn run_turn(&self, phone: &str, envelope: &InboundEnvelope) -> Result<TurnReport> {
        let store = &self.services.store;

        // 1. Load or create the user and record the inbound message
        let (_, created) = store.ensure_user(phone).await?;
        let content = message_content(envelope);
        let has_content = !content.is_empty();
        if has_content {
            store.add_message(phone, NewMessage::from_user(content)).await?;
        }

        // 2. First contact always gets the intro, never a tool call
        if created {
            info!(phone = %phone, "First contact, sending intro");
            self.services.reply(phone, &messages::intro_message()).await;
            return Ok(report(phone, TurnStage::FirstContact, &TurnContext::new(phone)));
        }

        if !has_content {
            debug!("Empty message from {}, nothing to do", phone);
            return Ok(report(phone, TurnStage::Skipped, &TurnContext::new(phone)));
        }

        // 3. Build the window from a fresh snapshot
        let user = self.services.require_user(phone).await?;
        let recent = recent_messages(&user, store.now());
        debug!("{} message(s) in the window for {}", recent.len(), phone);

        // 4. Dispatch on profile state
        let mut ctx = TurnContext::new(phone);
        let stage = if user.is_complete() {
            food_logging::run(&self.services, &self.background, &user, &recent, &mut ctx).await?;
            TurnStage::FoodLogging
        } else {
            onboarding::run(&self.services, &user, &recent, &mut ctx).await?;
            TurnStage::Onboarding
        };

        let turn = report(phone, stage, &ctx);
        info!("Turn for {} done: {:?} {:?}", phone, turn.stage, turn.actions);
        Ok(turn)
    }

    /// Wait for background work (insights) to finish.
    pub async fn wait_idle(&self) {
        self.background.wait_idle().await;
    }

    /// Background tasks, for callers that spawn alongside turns.
    pub fn background(&self) -> &BackgroundTasks {
        &self.background
    }
}

fn report(phone: &str, stage: TurnStage, ctx: &TurnContext) -> TurnReport {
    TurnReport {
        phone: phone.to_string(),
        stage,
        actions: ctx.invoked(),
    }
}

fn message_content(envelope: &InboundEnvelope) -> MessageContent {
    MessageContent {
        text: envelope
            .content
            .text
            .clone()
            .filter(|text| !text.trim().is_empty()),
        media: envelope.content.media.as_ref().map(|media| MediaRef {
            url: media.url.clone(),
            media_type: media.media_type.clone(),
            mime_type: media.mime_type.clone(),
        }),
    }
}
