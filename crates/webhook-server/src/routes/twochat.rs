//! 2Chat admin routes: account checks, test sends and webhook subscriptions.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;
use twochat::{
    ApiKeyInfo, DeleteWebhookResponse, NumbersResponse, SendMessagePayload, SendMessageResult,
    SubscribeWebhookResponse, WebhooksResponse,
};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Body of `POST /api/twochat/send-test-message`.
#[derive(Debug, Default, Deserialize)]
pub struct TestMessageRequest {
    #[serde(default)]
    pub to_number: String,
    #[serde(default)]
    pub message: String,
    pub file_url: Option<String>,
}

/// Body of `POST /api/twochat/webhook`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub hook_url: String,
}

pub async fn check_api_key(State(state): State<AppState>) -> Result<Json<ApiKeyInfo>> {
    Ok(Json(state.twochat.check_api_key().await?))
}

pub async fn numbers(State(state): State<AppState>) -> Result<Json<NumbersResponse>> {
    Ok(Json(state.twochat.get_numbers().await?))
}

pub async fn send_test_message(
    State(state): State<AppState>,
    Json(req): Json<TestMessageRequest>,
) -> Result<Json<SendMessageResult>> {
    if req.to_number.trim().is_empty() || req.message.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "to_number and message are required".to_string(),
        ));
    }

    let mut payload =
        SendMessagePayload::text(state.twochat.phone_number(), &req.to_number, &req.message);
    if let Some(url) = req.file_url.filter(|url| !url.trim().is_empty()) {
        payload = payload.with_media(url);
    }
    info!("Sending test message to {}", req.to_number);
    Ok(Json(state.twochat.send_message(&payload).await?))
}

pub async fn subscribe_webhook(
    State(state): State<AppState>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<SubscribeWebhookResponse>> {
    if req.event_name.trim().is_empty() || req.hook_url.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "eventName and hookUrl are required".to_string(),
        ));
    }
    Ok(Json(
        state
            .twochat
            .subscribe_webhook(&req.event_name, &req.hook_url)
            .await?,
    ))
}

pub async fn list_webhooks(State(state): State<AppState>) -> Result<Json<WebhooksResponse>> {
    Ok(Json(state.twochat.list_webhooks().await?))
}

pub async fn delete_webhook(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<DeleteWebhookResponse>> {
    if uuid.trim().is_empty() {
        return Err(ApiError::BadRequest("webhook uuid is required".to_string()));
    }
    Ok(Json(state.twochat.delete_webhook(&uuid).await?))
}
