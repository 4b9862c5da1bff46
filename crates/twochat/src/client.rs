//! 2Chat HTTP client.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::config::TwoChatConfig;
use crate::error::TwoChatError;
use crate::types::{
    ApiErrorBody, ApiKeyInfo, CheckNumberResponse, DeleteWebhookResponse, NumbersResponse,
    SendMessagePayload, SendMessageResult, SubscribeWebhookRequest, SubscribeWebhookResponse,
    WebhooksResponse,
};

/// Client for the 2Chat open API.
#[derive(Clone)]
pub struct TwoChatClient {
    http: Client,
    config: TwoChatConfig,
}

impl TwoChatClient {
    /// Create a client. Fails on an empty API key.
    pub fn new(config: TwoChatConfig) -> Result<Self, TwoChatError> {
        if config.api_key.trim().is_empty() {
            return Err(TwoChatError::Config("API key is required".to_string()));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(TwoChatError::Http)?;

        info!("2Chat client ready for {}", config.phone_number);
        Ok(Self { http, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, TwoChatError> {
        Self::new(TwoChatConfig::from_env()?)
    }

    pub fn config(&self) -> &TwoChatConfig {
        &self.config
    }

    /// Our WhatsApp number.
    pub fn phone_number(&self) -> &str {
        &self.config.phone_number
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("X-User-API-Key", &self.config.api_key)
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, TwoChatError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(ApiErrorBody::message)
                .unwrap_or_else(|| "Unknown error".to_string());
            error!("2Chat API error ({}): {}", status.as_u16(), message);
            return Err(TwoChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Verify the API key and read account limits.
    pub async fn check_api_key(&self) -> Result<ApiKeyInfo, TwoChatError> {
        self.execute(self.request(Method::GET, &self.config.info_url()))
            .await
    }

    /// Send a WhatsApp message.
    pub async fn send_message(
        &self,
        payload: &SendMessagePayload,
    ) -> Result<SendMessageResult, TwoChatError> {
        debug!("Sending message to {}", payload.to_number);
        self.execute(
            self.request(Method::POST, &self.config.send_message_url())
                .json(payload),
        )
        .await
    }

    /// Send a text message from our number.
    pub async fn send_text(&self, to: &str, text: &str) -> Result<SendMessageResult, TwoChatError> {
        let payload = SendMessagePayload::text(&self.config.phone_number, to, text);
        self.send_message(&payload).await
    }

    /// Numbers connected to the account.
    pub async fn get_numbers(&self) -> Result<NumbersResponse, TwoChatError> {
        self.execute(self.request(Method::GET, &self.config.numbers_url()))
            .await
    }

    /// Whether a phone number is on WhatsApp.
    pub async fn check_number(&self, phone_number: &str) -> Result<CheckNumberResponse, TwoChatError> {
        self.execute(self.request(Method::GET, &self.config.check_number_url(phone_number)))
            .await
    }

    /// Current webhook subscriptions.
    pub async fn list_webhooks(&self) -> Result<WebhooksResponse, TwoChatError> {
        self.execute(self.request(Method::GET, &self.config.webhooks_url()))
            .await
    }

    /// Subscribe `hook_url` to `event_name` on our number.
    pub async fn subscribe_webhook(
        &self,
        event_name: &str,
        hook_url: &str,
    ) -> Result<SubscribeWebhookResponse, TwoChatError> {
        let body = SubscribeWebhookRequest {
            hook_url,
            on_number: &self.config.phone_number,
        };
        info!("Subscribing {} to {}", hook_url, event_name);
        self.execute(
            self.request(Method::POST, &self.config.subscribe_url(event_name))
                .json(&body),
        )
        .await
    }

    /// Delete a webhook subscription.
    pub async fn delete_webhook(&self, uuid: &str) -> Result<DeleteWebhookResponse, TwoChatError> {
        info!("Deleting webhook {}", uuid);
        self.execute(self.request(Method::DELETE, &self.config.webhook_url(uuid)))
            .await
    }
}
