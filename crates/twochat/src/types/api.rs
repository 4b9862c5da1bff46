//! Request and response bodies of the 2Chat REST API.

use serde::{Deserialize, Serialize};

/// Body of `POST /whatsapp/send-message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendMessagePayload {
    pub to_number: String,
    pub from_number: String,
    pub text: String,
    /// Media to attach, by URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SendMessagePayload {
    /// A text message.
    pub fn text(
        from_number: impl Into<String>,
        to_number: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            to_number: to_number.into(),
            from_number: from_number.into(),
            text: text.into(),
            url: None,
        }
    }

    /// Attach media by URL.
    pub fn with_media(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Result of sending a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub batched: bool,
    #[serde(default)]
    pub message_uuid: Option<String>,
}

/// `GET /info/` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyInfo {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub account: Option<AccountInfo>,
    #[serde(default)]
    pub limits: Option<ApiLimits>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub name: String,
    pub uuid: String,
    #[serde(default)]
    pub on_trial: bool,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiLimits {
    pub requests_per_minute: u32,
}

/// A WhatsApp number connected to the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberInfo {
    pub uuid: String,
    pub phone_number: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub iso_country_code: Option<String>,
    #[serde(default)]
    pub connection_status: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub is_business_profile: bool,
    #[serde(default)]
    pub channel_type: Option<String>,
}

/// `GET /whatsapp/get-numbers` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumbersResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub numbers: Vec<NumberInfo>,
}

/// A webhook subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub uuid: String,
    pub event_name: String,
    #[serde(default)]
    pub channel_uuid: Option<String>,
    pub hook_url: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `GET /webhooks` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhooksResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
}

/// Body of `POST /webhooks/subscribe/{event}`.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeWebhookRequest<'a> {
    pub hook_url: &'a str,
    pub on_number: &'a str,
}

/// `POST /webhooks/subscribe/{event}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeWebhookResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Webhook>,
}

/// `DELETE /webhooks/{uuid}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteWebhookResponse {
    #[serde(default)]
    pub success: bool,
}

/// `GET /whatsapp/check-number/{number}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckNumberResponse {
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub on_whatsapp: bool,
}

/// Error body; 2Chat uses either `detail` or `error_message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ApiErrorBody {
    pub(crate) fn message(self) -> Option<String> {
        self.detail.or(self.error_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_payload_skips_missing_url() {
        let payload = SendMessagePayload::text("+1", "+2", "hola");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["from_number"], "+1");
        assert_eq!(json["to_number"], "+2");
        assert!(json.get("url").is_none());

        let json = serde_json::to_value(payload.with_media("https://x/1.png")).unwrap();
        assert_eq!(json["url"], "https://x/1.png");
    }

    #[test]
    fn test_error_body_prefers_detail() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"detail": "bad key", "error_message": "x"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("bad key"));

        let body: ApiErrorBody = serde_json::from_str(r#"{"error_message": "nope"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("nope"));
    }

    #[test]
    fn test_parse_webhooks() {
        let body = r#"{"success": true, "webhooks": [{
            "uuid": "WHK1", "event_name": "message.received", "channel_uuid": "C1",
            "hook_url": "https://bot/api/webhook", "id": 3, "account_id": 9,
            "created_at": "2024-01-01T00:00:00", "hook_params": {"waweb_uuid": "W"}
        }]}"#;
        let parsed: WebhooksResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.webhooks[0].event_name, "message.received");
    }
}
