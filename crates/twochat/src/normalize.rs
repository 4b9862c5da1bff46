//! Webhook normalization.
//!
//! Turns a raw 2Chat webhook body into an [`InboundEvent`]. Receipt
//! notifications are recognised before anything else is checked; message
//! payloads are validated, classified by content and, for voice notes and
//! audio, transcribed so the rest of the system only deals with text.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use transcription::Transcriber;

use crate::error::TwoChatError;
use crate::types::WebhookPayload;

/// Text substituted when a voice note cannot be transcribed.
pub const TRANSCRIPTION_FAILED_TEXT: &str = "Audio transcription failed";

const REQUIRED_KEYS: [&str; 4] = ["uuid", "created_at", "remote_phone_number", "message"];

/// Kind of inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Audio,
    Video,
    File,
    /// Push-to-talk voice note.
    Ptt,
    Other,
}

impl MessageKind {
    fn from_media_type(media_type: &str) -> Self {
        match media_type {
            "image" => MessageKind::Image,
            "audio" => MessageKind::Audio,
            "video" => MessageKind::Video,
            "file" => MessageKind::File,
            "ptt" => MessageKind::Ptt,
            _ => MessageKind::Other,
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, MessageKind::Audio | MessageKind::Ptt)
    }
}

/// Media in a normalized envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeMedia {
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    pub mime_type: String,
}

/// Normalized content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<EnvelopeMedia>,
}

/// Who sent the message, as far as the provider knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderInfo {
    pub name: Option<String>,
    pub profile_pic_url: Option<String>,
    pub device: Option<String>,
}

/// A normalized inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEnvelope {
    pub kind: MessageKind,
    pub message_id: String,
    /// Provider timestamp string.
    pub timestamp: String,
    pub from: String,
    pub to: String,
    pub content: EnvelopeContent,
    pub sender_info: Option<SenderInfo>,
}

impl InboundEnvelope {
    /// A text message; handy for tests and local tools.
    pub fn text(from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Text,
            message_id: String::new(),
            timestamp: String::new(),
            from: from.into(),
            to: String::new(),
            content: EnvelopeContent {
                text: Some(text.into()),
                media: None,
            },
            sender_info: None,
        }
    }

    /// A media message with optional caption.
    pub fn media(
        from: impl Into<String>,
        kind: MessageKind,
        media: EnvelopeMedia,
        caption: Option<String>,
    ) -> Self {
        Self {
            kind,
            message_id: String::new(),
            timestamp: String::new(),
            from: from.into(),
            to: String::new(),
            content: EnvelopeContent {
                text: caption,
                media: Some(media),
            },
            sender_info: None,
        }
    }

    /// Provider timestamp parsed leniently.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Result of normalizing a webhook body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A delivery or read receipt; acknowledged but not processed.
    Receipt { event: String },
    Message(InboundEnvelope),
}

/// Whether an event name is a delivery/read/sent receipt.
pub fn is_receipt_event(event: &str) -> bool {
    matches!(event, "message.read" | "message.delivered" | "message.sent")
        || event.ends_with(".read")
        || event.ends_with(".delivered")
}

/// Parse RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Normalize a raw webhook body.
pub async fn normalize(
    payload: &Value,
    transcriber: &dyn Transcriber,
) -> Result<InboundEvent, TwoChatError> {
    if let Some(event) = payload.get("event").and_then(Value::as_str) {
        if is_receipt_event(event) {
            return Ok(InboundEvent::Receipt {
                event: event.to_string(),
            });
        }
    }

    let object = payload
        .as_object()
        .ok_or_else(|| TwoChatError::MalformedPayload("expected a JSON object".to_string()))?;
    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(TwoChatError::MalformedPayload(format!(
                "missing required key '{}'",
                key
            )));
        }
    }

    let webhook: WebhookPayload = serde_json::from_value(payload.clone())
        .map_err(|e| TwoChatError::MalformedPayload(e.to_string()))?;

    let text = webhook
        .message
        .text
        .clone()
        .filter(|t| !t.trim().is_empty());
    let kind = match (&text, &webhook.message.media) {
        (Some(_), _) => MessageKind::Text,
        (None, Some(media)) => MessageKind::from_media_type(&media.media_type),
        (None, None) => MessageKind::Other,
    };

    let mut content = EnvelopeContent {
        text,
        media: webhook.message.media.as_ref().map(|m| EnvelopeMedia {
            media_type: m.media_type.clone(),
            url: m.url.clone(),
            mime_type: m.mime_type.clone(),
        }),
    };

    if let Some(ref media) = content.media {
        if MessageKind::from_media_type(&media.media_type).is_audio() {
            let transcript = match transcriber.transcribe(&media.url).await {
                Ok(text) if !text.trim().is_empty() => {
                    info!(from = %webhook.remote_phone_number, "Transcribed audio message");
                    text
                }
                Ok(_) => {
                    warn!("Transcription of {} came back empty", media.url);
                    TRANSCRIPTION_FAILED_TEXT.to_string()
                }
                Err(e) => {
                    warn!("Transcription of {} failed: {}", media.url, e);
                    TRANSCRIPTION_FAILED_TEXT.to_string()
                }
            };
            content.text = Some(transcript);
        }
    }

    let sender_info = webhook.contact.as_ref().map(|contact| SenderInfo {
        name: contact.display_name(),
        profile_pic_url: contact.profile_pic_url.clone(),
        device: contact.device.clone(),
    });

    Ok(InboundEvent::Message(InboundEnvelope {
        kind,
        message_id: webhook.uuid,
        timestamp: webhook.created_at,
        from: webhook.remote_phone_number,
        to: webhook.channel_phone_number.unwrap_or_default(),
        content,
        sender_info,
    }))
}
