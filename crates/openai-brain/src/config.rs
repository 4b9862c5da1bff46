//! Configuration for OpenAiBrain.

use brain_core::BrainError;
use std::env;

/// Default API URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Configuration for OpenAiBrain.
#[derive(Debug, Clone)]
pub struct OpenAiBrainConfig {
    /// API base URL (without the `/v1/...` path).
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for OpenAiBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: Some(2048),
            temperature: Some(0.3),
            request_timeout_secs: 90,
        }
    }
}

impl OpenAiBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENAI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENAI_API_URL` - API URL (default: https://api.openai.com)
    /// - `OPENAI_MODEL` - Model name (default: gpt-4o)
    /// - `OPENAI_MAX_TOKENS` - Max tokens (default: 2048)
    /// - `OPENAI_TEMPERATURE` - Temperature (default: 0.3)
    /// - `OPENAI_REQUEST_TIMEOUT_SECS` - HTTP timeout (default: 90)
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| BrainError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        let api_url = env::var("OPENAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_tokens = env::var("OPENAI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(2048));

        let temperature = env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(0.3));

        let request_timeout_secs = env::var("OPENAI_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(90);

        Ok(Self {
            api_url,
            api_key,
            model,
            max_tokens,
            temperature,
            request_timeout_secs,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenAiBrainConfigBuilder {
        OpenAiBrainConfigBuilder::default()
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Builder for OpenAiBrainConfig.
#[derive(Debug, Default)]
pub struct OpenAiBrainConfigBuilder {
    config: OpenAiBrainConfig,
}

impl OpenAiBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the HTTP timeout.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenAiBrainConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAiBrainConfig::default();

        assert_eq!(config.api_url, "https://api.openai.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, Some(2048));
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.request_timeout_secs, 90);
    }

    #[test]
    fn test_builder_all_options() {
        let config = OpenAiBrainConfig::builder()
            .api_key("my-key")
            .api_url("https://custom.api.com/")
            .model("gpt-4o-mini")
            .max_tokens(512)
            .temperature(0.5)
            .request_timeout_secs(10)
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.temperature, Some(0.5));
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(
            config.completions_url(),
            "https://custom.api.com/v1/chat/completions"
        );
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_openai_vars() {
            std::env::remove_var("OPENAI_API_KEY");
            std::env::remove_var("OPENAI_API_URL");
            std::env::remove_var("OPENAI_MODEL");
            std::env::remove_var("OPENAI_MAX_TOKENS");
            std::env::remove_var("OPENAI_TEMPERATURE");
            std::env::remove_var("OPENAI_REQUEST_TIMEOUT_SECS");
        }

        // Missing API key should error
        clear_all_openai_vars();
        match OpenAiBrainConfig::from_env() {
            Err(BrainError::Configuration(msg)) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        // Only API key set, defaults used
        clear_all_openai_vars();
        std::env::set_var("OPENAI_API_KEY", "test-env-key");
        let config = OpenAiBrainConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.api_url, "https://api.openai.com");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, Some(2048));

        // All vars set
        clear_all_openai_vars();
        std::env::set_var("OPENAI_API_KEY", "full-key");
        std::env::set_var("OPENAI_API_URL", "http://localhost:11434");
        std::env::set_var("OPENAI_MODEL", "llama3");
        std::env::set_var("OPENAI_MAX_TOKENS", "100");
        std::env::set_var("OPENAI_TEMPERATURE", "0.9");
        std::env::set_var("OPENAI_REQUEST_TIMEOUT_SECS", "5");
        let config = OpenAiBrainConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://localhost:11434");
        assert_eq!(config.model, "llama3");
        assert_eq!(config.max_tokens, Some(100));
        assert_eq!(config.temperature, Some(0.9));
        assert_eq!(config.request_timeout_secs, 5);

        clear_all_openai_vars();
    }
}
