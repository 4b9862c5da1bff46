//! Inbound 2Chat webhook.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};
use twochat::{normalize, InboundEvent, TwoChatError};

use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub message: &'static str,
}

/// Normalize the payload and run the turn in the background.
///
/// The response does not wait for the turn; 2Chat retries slow webhooks.
pub async fn receive(State(state): State<AppState>, body: Bytes) -> Result<Json<WebhookResponse>> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::MalformedPayload(format!("invalid JSON: {}", e)))?;

    let envelope = match normalize(&payload, state.transcriber.as_ref()).await {
        Ok(InboundEvent::Receipt { event }) => {
            info!("Receipt event: {}", event);
            return Ok(Json(WebhookResponse {
                message: "Message read event processed",
            }));
        }
        Ok(InboundEvent::Message(envelope)) => envelope,
        Err(TwoChatError::MalformedPayload(msg)) => return Err(ApiError::MalformedPayload(msg)),
        Err(e) => return Err(ApiError::Internal(e.to_string())),
    };

    info!(
        from = %envelope.from,
        kind = ?envelope.kind,
        id = %envelope.message_id,
        "Received message"
    );

    let orchestrator = state.orchestrator.clone();
    state
        .orchestrator
        .background()
        .spawn(async move {
            if let Err(e) = orchestrator.process(envelope).await {
                error!("Turn failed: {}", e);
            }
        })
        .await;

    Ok(Json(WebhookResponse {
        message: "Webhook processed successfully",
    }))
}
