//! Scripted brain - replays a queue of canned generations.

use std::collections::VecDeque;

use brain_core::{async_trait, Brain, BrainError, Generation, GenerationRequest, ToolRequest};
use serde_json::Value;
use tokio::sync::Mutex;

/// A brain that answers from a fixed script and records every request.
///
/// Each call to `generate` pops the next scripted response. Once the script
/// is exhausted, calls fail with [`BrainError::Unavailable`], which makes an
/// unexpected extra model call visible in tests.
#[derive(Default)]
pub struct ScriptedBrain {
    script: Mutex<VecDeque<Result<Generation, BrainError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    next_call_id: Mutex<u32>,
}

impl ScriptedBrain {
    /// Create a brain with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a generation.
    pub fn then(mut self, generation: Generation) -> Self {
        self.script.get_mut().push_back(Ok(generation));
        self
    }

    /// Queue a text-only answer.
    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.then(Generation::text(text))
    }

    /// Queue a JSON value as text, as a structured-output call would return.
    pub fn then_json(self, value: Value) -> Self {
        self.then(Generation::text(value.to_string()))
    }

    /// Queue a single tool call.
    pub fn then_tool_call(self, name: impl Into<String>, arguments: Value) -> Self {
        self.then_tool_calls(vec![(name.into(), arguments)])
    }

    /// Queue several tool calls issued in one generation.
    pub fn then_tool_calls(mut self, calls: Vec<(String, Value)>) -> Self {
        let counter = self.next_call_id.get_mut();
        let requests = calls
            .into_iter()
            .map(|(name, arguments)| {
                *counter += 1;
                ToolRequest::new(format!("call_{}", counter), name, arguments)
            })
            .collect();
        self.then(Generation::tool_calls(requests))
    }

    /// Queue a failure.
    pub fn then_error(mut self, error: BrainError) -> Self {
        self.script.get_mut().push_back(Err(error));
        self
    }

    /// Requests received so far, in call order.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of `generate` calls made.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Scripted responses not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl Brain for ScriptedBrain {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, BrainError> {
        self.requests.lock().await.push(request);
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(BrainError::Unavailable("script exhausted".to_string())))
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}
