//! Webhook payload types posted by 2Chat.

use serde::{Deserialize, Serialize};

/// A `message.received` webhook body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub id: Option<String>,

    pub uuid: String,

    /// Provider timestamp, kept as sent.
    pub created_at: String,

    #[serde(default)]
    pub session_key: Option<String>,

    pub message: WebhookMessage,

    /// The sender's number.
    pub remote_phone_number: String,

    /// Our number, when the provider includes it.
    #[serde(default)]
    pub channel_phone_number: Option<String>,

    /// "user" or "system".
    #[serde(default)]
    pub sent_by: Option<String>,

    #[serde(default)]
    pub contact: Option<Contact>,

    /// Event name, set on receipt notifications.
    #[serde(default)]
    pub event: Option<String>,
}

/// Message body: text and/or media.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub media: Option<WebhookMedia>,
}

/// Media attached to a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookMedia {
    pub url: String,
    /// image, audio, video, file or ptt (voice note).
    #[serde(rename = "type")]
    pub media_type: String,
    #[serde(default)]
    pub mime_type: String,
}

/// Contact details of the sender.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
}

impl Contact {
    /// `friendly_name`, else "first last" trimmed.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self
            .friendly_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            return Some(name.to_string());
        }
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        (!full.is_empty()).then(|| full.to_string())
    }
}
