//! Application state shared across handlers.

use std::sync::Arc;

use nutrition_store::UserRepository;
use orchestrator::Orchestrator;
use transcription::Transcriber;
use twochat::TwoChatClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Conversation orchestrator; turns run on its background set.
    pub orchestrator: Arc<Orchestrator>,
    /// 2Chat client for the admin routes.
    pub twochat: TwoChatClient,
    /// Voice-note transcription used while normalizing webhooks.
    pub transcriber: Arc<dyn Transcriber>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        twochat: TwoChatClient,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        Self {
            orchestrator,
            twochat,
            transcriber,
        }
    }

    pub fn store(&self) -> &Arc<dyn UserRepository> {
        self.orchestrator.store()
    }
}
