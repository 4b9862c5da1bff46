//! OpenAI chat completions request and response types.

use brain_core::{ChatMessage, ResponseFormat, Role, ToolChoice, ToolDefinition, ToolRequest};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Chat completion request.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

/// A message in wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    /// String content, or an array of content parts for vision input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ApiToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ApiMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(Value::String(content.into())),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

impl From<&ChatMessage> for ApiMessage {
    fn from(message: &ChatMessage) -> Self {
        let content = if message.images.is_empty() {
            if message.content.is_empty() && !message.tool_calls.is_empty() {
                None
            } else {
                Some(Value::String(message.content.clone()))
            }
        } else {
            let mut parts = vec![json!({"type": "text", "text": message.content})];
            parts.extend(
                message
                    .images
                    .iter()
                    .map(|url| json!({"type": "image_url", "image_url": {"url": url}})),
            );
            Some(Value::Array(parts))
        };

        Self {
            role: message.role.as_str().to_string(),
            content,
            tool_calls: message.tool_calls.iter().map(ApiToolCall::from).collect(),
            tool_call_id: match message.role {
                Role::Tool => message.tool_call_id.clone(),
                _ => None,
            },
        }
    }
}

/// A tool call in wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: ApiFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

/// Function name and JSON-encoded arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

impl From<&ToolRequest> for ApiToolCall {
    fn from(request: &ToolRequest) -> Self {
        Self {
            id: request.id.clone(),
            call_type: function_type(),
            function: ApiFunctionCall {
                name: request.name.clone(),
                arguments: request.arguments_json(),
            },
        }
    }
}

impl ApiToolCall {
    pub fn into_request(self) -> ToolRequest {
        ToolRequest::from_call_lenient(self.id, self.function.name, &self.function.arguments)
    }
}

/// Wire value for `tool_choice`, omitted when no tools are declared.
pub fn tool_choice_value(choice: &ToolChoice, has_tools: bool) -> Option<Value> {
    if !has_tools {
        return None;
    }
    Some(match choice {
        ToolChoice::Auto => json!("auto"),
        ToolChoice::Required => json!("required"),
        ToolChoice::None => json!("none"),
        ToolChoice::Function(name) => json!({"type": "function", "function": {"name": name}}),
    })
}

/// Wire value for `response_format`.
pub fn response_format_value(format: &ResponseFormat) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": format.name,
            "schema": format.schema,
            "strict": false
        }
    })
}

/// Chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ApiToolCall>>,
}

/// Token usage statistics.
#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// API error body.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}
