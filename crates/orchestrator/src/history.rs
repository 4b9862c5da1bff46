//! Conversation window rendering for model calls.

use brain_core::ChatMessage;
use nutrition_store::Message;

/// Window messages as chat turns. Image media is attached as image parts.
pub fn chat_history(recent: &[Message]) -> Vec<ChatMessage> {
    recent
        .iter()
        .filter(|m| !m.content.is_empty())
        .map(|m| {
            if m.is_from_user() {
                let mut message = ChatMessage::user(m.content.as_prompt_text());
                if let Some(media) = m.content.media.as_ref().filter(|media| media.is_image()) {
                    message = message.with_image(media.url.clone());
                }
                message
            } else {
                ChatMessage::assistant(m.content.text.clone().unwrap_or_default())
            }
        })
        .collect()
}

/// Window messages as plain text, one per line, media URLs included.
pub fn render_conversation(recent: &[Message]) -> String {
    recent
        .iter()
        .filter(|m| !m.content.is_empty())
        .map(|m| {
            let who = if m.is_from_user() { "usuario" } else { "asistente" };
            format!("{}: {}", who, m.content.as_prompt_text())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Most recent message from the user.
pub fn latest_user_message(recent: &[Message]) -> Option<&Message> {
    recent.iter().rev().find(|m| m.is_from_user())
}

/// Image URLs sent by the user inside the window.
pub fn user_image_urls(recent: &[Message]) -> Vec<String> {
    recent
        .iter()
        .filter(|m| m.is_from_user())
        .filter_map(|m| m.content.media.as_ref())
        .filter(|media| media.is_image())
        .map(|media| media.url.clone())
        .collect()
}
