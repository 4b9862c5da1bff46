//! Console chat example.
//!
//! Talks to the orchestrator from the terminal, as if each line were a
//! WhatsApp message from one phone number. Replies are printed instead of
//! being sent through 2Chat.
//!
//! Run with: cargo run -p orchestrator --example console_chat
//!
//! Configuration via .env file or environment variables:
//!   OPENAI_API_KEY     - API key for the model (required)
//!   OPENAI_MODEL       - Model name (default: gpt-4o)
//!   CHAT_PHONE         - Phone number to impersonate (default: +5491100000001)

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use nutrition_store::UserStore;
use openai_brain::OpenAiBrain;
use orchestrator::{MessageSender, Orchestrator, OrchestratorConfig, OrchestratorError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;
use twochat::InboundEnvelope;

/// Prints outbound messages to stdout.
struct ConsoleSender;

#[async_trait]
impl MessageSender for ConsoleSender {
    async fn send_message(&self, _recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        println!("\n🤖 {}\n", text);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,orchestrator=info".into()),
        )
        .init();

    let phone = env::var("CHAT_PHONE").unwrap_or_else(|_| "+5491100000001".to_string());
    let orchestrator = Orchestrator::with_config(
        Arc::new(UserStore::new()),
        Arc::new(OpenAiBrain::from_env()?),
        Arc::new(ConsoleSender),
        OrchestratorConfig::from_env()?,
    );

    println!("Chatting as {}. Ctrl-D to quit.", phone);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = orchestrator
            .process(InboundEnvelope::text(phone.clone(), line))
            .await
        {
            error!("Turn failed: {}", e);
        }
    }

    orchestrator.wait_idle().await;
    Ok(())
}
