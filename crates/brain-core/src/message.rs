//! Request and response types for a single model call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::{ToolChoice, ToolDefinition, ToolRequest, ToolResult};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// A chat message sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub role: Role,
    /// Message text (may be empty for assistant tool-call turns).
    pub content: String,
    /// Image URLs attached to a user message.
    pub images: Vec<String>,
    /// Tool calls issued by the assistant in this message.
    pub tool_calls: Vec<ToolRequest>,
    /// For `Role::Tool` messages, the call this result answers.
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            images: Vec::new(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create an assistant message that carries tool calls.
    pub fn assistant_tool_calls(content: impl Into<String>, calls: Vec<ToolRequest>) -> Self {
        let mut message = Self::with_role(Role::Assistant, content);
        message.tool_calls = calls;
        message
    }

    /// Create a tool result message.
    pub fn tool_result(result: &ToolResult) -> Self {
        let mut message = Self::with_role(Role::Tool, result.content.clone());
        message.tool_call_id = Some(result.tool_call_id.clone());
        message
    }

    /// Attach an image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }
}

/// JSON-schema constrained output format.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    /// Schema name, as required by providers that support named schemas.
    pub name: String,
    /// JSON Schema the output must satisfy.
    pub schema: Value,
}

impl ResponseFormat {
    pub fn json_schema(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Everything one model call needs.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// System instructions.
    pub system: Option<String>,
    /// Conversation context, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Tools the model may invoke.
    pub tools: Vec<ToolDefinition>,
    /// How the model must treat the declared tools.
    pub tool_choice: ToolChoice,
    /// Structured output constraint.
    pub response_format: Option<ResponseFormat>,
}

impl GenerationRequest {
    /// Create a request with the given system prompt.
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            ..Default::default()
        }
    }

    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>, choice: ToolChoice) -> Self {
        self.tools = tools;
        self.tool_choice = choice;
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// Output of one model call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    /// Free text produced by the model, if any.
    pub text: Option<String>,
    /// Tool invocations, in the order the model issued them.
    pub tool_calls: Vec<ToolRequest>,
}

impl Generation {
    /// A text-only generation.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A generation made of tool calls only.
    pub fn tool_calls(calls: Vec<ToolRequest>) -> Self {
        Self {
            text: None,
            tool_calls: calls,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// The text trimmed, or `None` when it is missing or blank.
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_message_keeps_call_id() {
        let result = ToolResult::success("call-1", "ok");
        let message = ChatMessage::tool_result(&result);
        assert_eq!(message.role, Role::Tool);
        assert_eq!(message.tool_call_id.as_deref(), Some("call-1"));
        assert_eq!(message.content, "ok");
    }

    #[test]
    fn test_non_empty_text() {
        assert_eq!(Generation::text("  hola ").non_empty_text(), Some("hola"));
        assert_eq!(Generation::text("   ").non_empty_text(), None);
        assert_eq!(Generation::default().non_empty_text(), None);
    }

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("system")
            .with_message(ChatMessage::user("hola").with_image("https://img/1.jpg"))
            .with_tools(vec![], ToolChoice::Required);

        assert_eq!(request.system.as_deref(), Some("system"));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].images, vec!["https://img/1.jpg".to_string()]);
        assert_eq!(request.tool_choice, ToolChoice::Required);
        assert!(request.response_format.is_none());
    }
}
