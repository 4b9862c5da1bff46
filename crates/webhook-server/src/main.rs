//! Webhook server for the nutrition assistant.
//!
//! Receives 2Chat WhatsApp webhooks, hands each message to the orchestrator
//! and exposes a few admin routes for the 2Chat account.

mod config;
mod error;
mod routes;
mod sender;
mod state;

use std::sync::Arc;

use nutrition_store::UserStore;
use openai_brain::OpenAiBrain;
use orchestrator::{Orchestrator, OrchestratorConfig};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use transcription::DeepgramTranscriber;
use twochat::TwoChatClient;

use crate::config::Config;
use crate::sender::TwoChatSender;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let twochat = TwoChatClient::from_env()?;
    let transcriber = DeepgramTranscriber::from_env()?;
    let brain = OpenAiBrain::from_env()?;

    let orchestrator = Orchestrator::with_config(
        Arc::new(UserStore::new()),
        Arc::new(brain),
        Arc::new(TwoChatSender::new(twochat.clone())),
        OrchestratorConfig::from_env()?,
    );
    let state = AppState::new(Arc::new(orchestrator), twochat, Arc::new(transcriber));

    // Build router
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Start server
    info!(addr = %config.addr, "Webhook server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Waiting for in-flight turns");
    state.orchestrator.wait_idle().await;
    info!("Webhook server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
