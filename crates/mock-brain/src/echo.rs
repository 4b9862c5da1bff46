//! Echo brain implementation - echoes the last user message back.

use brain_core::{async_trait, Brain, BrainError, Generation, GenerationRequest, Role};

/// A simple brain that answers with the last user message, never calling tools.
///
/// Useful for testing the conversational fallback without any AI processing.
#[derive(Debug, Clone, Default)]
pub struct EchoBrain {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoBrain {
    /// Create a new EchoBrain with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoBrain with a custom prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_brain::EchoBrain;
    ///
    /// let brain = EchoBrain::with_prefix("Echo: ");
    /// // Will respond with "Echo: <last user message>"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl Brain for EchoBrain {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, BrainError> {
        let last = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let text = match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, last),
            None => last,
        };
        Ok(Generation::text(text))
    }

    fn name(&self) -> &str {
        "EchoBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::ChatMessage;

    #[tokio::test]
    async fn test_echo_last_user_message() {
        let brain = EchoBrain::new();
        let request = GenerationRequest::new("sys")
            .with_message(ChatMessage::user("primero"))
            .with_message(ChatMessage::assistant("respuesta"))
            .with_message(ChatMessage::user("segundo"));

        let generation = brain.generate(request).await.unwrap();
        assert_eq!(generation.non_empty_text(), Some("segundo"));
        assert!(!generation.has_tool_calls());
    }

    #[tokio::test]
    async fn test_echo_with_prefix() {
        let brain = EchoBrain::with_prefix("Echo: ");
        let request = GenerationRequest::new("sys").with_message(ChatMessage::user("Hola"));

        let generation = brain.generate(request).await.unwrap();
        assert_eq!(generation.text.as_deref(), Some("Echo: Hola"));
    }

    #[tokio::test]
    async fn test_brain_name_and_ready() {
        let brain = EchoBrain::new();
        assert_eq!(brain.name(), "EchoBrain");
        assert!(brain.is_ready().await);
    }
}
