//! Recent conversation window used as model context.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Message, User};

/// How far back a turn looks for context.
pub const CONVERSATION_WINDOW: Duration = Duration::minutes(5);

/// Messages newer than `now - window`, in original order.
pub fn recent_messages_within(
    messages: &[Message],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<Message> {
    let cutoff = now - window;
    messages
        .iter()
        .filter(|m| m.timestamp > cutoff)
        .cloned()
        .collect()
}

/// The user's messages from the last five minutes.
pub fn recent_messages(user: &User, now: DateTime<Utc>) -> Vec<Message> {
    recent_messages_within(&user.conversation, now, CONVERSATION_WINDOW)
}
