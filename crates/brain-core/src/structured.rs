//! Structured output helpers.

use serde::de::DeserializeOwned;

use crate::error::BrainError;
use crate::message::GenerationRequest;
use crate::trait_def::Brain;

/// Run a model call and decode its text as JSON into `T`.
///
/// The request should carry a [`ResponseFormat`](crate::ResponseFormat) so the
/// provider constrains the output, but the text is decoded defensively anyway.
pub async fn generate_object<T: DeserializeOwned>(
    brain: &dyn Brain,
    request: GenerationRequest,
) -> Result<T, BrainError> {
    let generation = brain.generate(request).await?;
    let text = generation
        .non_empty_text()
        .ok_or_else(|| BrainError::InvalidResponse("empty structured response".to_string()))?;
    parse_object(text)
}

/// Decode model text as JSON, tolerating a surrounding markdown code fence.
pub fn parse_object<T: DeserializeOwned>(text: &str) -> Result<T, BrainError> {
    let body = strip_code_fence(text.trim());
    serde_json::from_str(body)
        .map_err(|e| BrainError::InvalidResponse(format!("expected JSON object: {}", e)))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
