//! Configuration for the Deepgram transcriber.

use std::env;

use crate::error::TranscriptionError;

/// Default API URL.
pub const DEFAULT_API_URL: &str = "https://api.deepgram.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "nova-2";

/// Configuration for [`DeepgramTranscriber`](crate::DeepgramTranscriber).
#[derive(Debug, Clone)]
pub struct DeepgramConfig {
    /// API base URL (without the `/v1/listen` path).
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for DeepgramConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl DeepgramConfig {
    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `DEEPGRAM_API_KEY`
    ///
    /// Optional:
    /// - `DEEPGRAM_API_URL` (default: https://api.deepgram.com)
    /// - `DEEPGRAM_MODEL` (default: nova-2)
    pub fn from_env() -> Result<Self, TranscriptionError> {
        let api_key = env::var("DEEPGRAM_API_KEY")
            .map_err(|_| TranscriptionError::Config("DEEPGRAM_API_KEY not set".to_string()))?;

        let api_url = env::var("DEEPGRAM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = env::var("DEEPGRAM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_url,
            api_key,
            model,
            ..Default::default()
        })
    }

    /// Create a new config builder.
    pub fn builder() -> DeepgramConfigBuilder {
        DeepgramConfigBuilder::default()
    }

    /// Full URL of the pre-recorded listen endpoint, with query options.
    pub fn listen_url(&self) -> String {
        format!(
            "{}/v1/listen?model={}&smart_format=true&detect_language=true",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Builder for DeepgramConfig.
#[derive(Debug, Default)]
pub struct DeepgramConfigBuilder {
    config: DeepgramConfig,
}

impl DeepgramConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn build(self) -> DeepgramConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_url() {
        let config = DeepgramConfig::builder()
            .api_key("k")
            .api_url("http://localhost:9999/")
            .build();
        assert_eq!(
            config.listen_url(),
            "http://localhost:9999/v1/listen?model=nova-2&smart_format=true&detect_language=true"
        );
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_vars() {
            std::env::remove_var("DEEPGRAM_API_KEY");
            std::env::remove_var("DEEPGRAM_API_URL");
            std::env::remove_var("DEEPGRAM_MODEL");
        }

        clear_vars();
        assert!(matches!(
            DeepgramConfig::from_env(),
            Err(TranscriptionError::Config(_))
        ));

        std::env::set_var("DEEPGRAM_API_KEY", "dg-key");
        let config = DeepgramConfig::from_env().unwrap();
        assert_eq!(config.api_key, "dg-key");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, "nova-2");

        std::env::set_var("DEEPGRAM_MODEL", "nova-3");
        let config = DeepgramConfig::from_env().unwrap();
        assert!(config.listen_url().contains("model=nova-3"));

        clear_vars();
    }
}
