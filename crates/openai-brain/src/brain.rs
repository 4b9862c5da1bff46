//! OpenAiBrain implementation using the chat completions API.

use std::time::Duration;

use brain_core::{async_trait, prompt_fingerprint, Brain, BrainError, Generation, GenerationRequest};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{
    response_format_value, tool_choice_value, ApiError, ApiMessage, ChatCompletionRequest,
    ChatCompletionResponse,
};
use crate::config::OpenAiBrainConfig;

/// A brain backed by an OpenAI-compatible chat completions endpoint.
///
/// Stateless: every call sends the full context from the request.
pub struct OpenAiBrain {
    client: Client,
    config: OpenAiBrainConfig,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain with the given configuration.
    pub fn new(config: OpenAiBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!("OpenAiBrain initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        let config = OpenAiBrainConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiBrainConfig {
        &self.config
    }

    fn build_request(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(ref system) = request.system {
            messages.push(ApiMessage::system(system.clone()));
        }
        messages.extend(request.messages.iter().map(ApiMessage::from));

        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            tools: request.tools.clone(),
            tool_choice: tool_choice_value(&request.tool_choice, !request.tools.is_empty()),
            response_format: request.response_format.as_ref().map(response_format_value),
        }
    }

    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, BrainError> {
        let url = self.config.completions_url();

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrainError::Timeout
                } else {
                    BrainError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(BrainError::ProcessingFailed(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BrainError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Brain for OpenAiBrain {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, BrainError> {
        if let Some(ref system) = request.system {
            debug!("System prompt fingerprint: {}", prompt_fingerprint(system));
        }
        debug!(
            "Generating with {} messages, {} tools, structured: {}",
            request.messages.len(),
            request.tools.len(),
            request.response_format.is_some()
        );

        let completion = self.chat_completion(self.build_request(&request)).await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let Some(choice) = completion.choices.into_iter().next() else {
            warn!("No choices in completion response");
            return Err(BrainError::InvalidResponse("no choices returned".to_string()));
        };

        if let Some(reason) = choice.finish_reason.as_deref() {
            debug!("Finish reason: {}", reason);
        }

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| call.into_request())
            .collect();

        Ok(Generation {
            text: choice.message.content,
            tool_calls,
        })
    }

    fn name(&self) -> &str {
        "OpenAiBrain"
    }
}
