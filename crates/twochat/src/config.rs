//! Configuration types for twochat.

use std::env;

use crate::error::TwoChatError;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.p.2chat.io/open";

/// Configuration for connecting to the 2Chat API.
#[derive(Debug, Clone)]
pub struct TwoChatConfig {
    /// Base URL of the open API (e.g., "https://api.p.2chat.io/open").
    pub base_url: String,
    /// Value of the `X-User-API-Key` header.
    pub api_key: String,
    /// The WhatsApp number messages are sent from.
    pub phone_number: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl TwoChatConfig {
    /// Create a configuration against the default base URL.
    pub fn new(api_key: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            phone_number: phone_number.into(),
            request_timeout_secs: 30,
        }
    }

    /// Use a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create configuration from environment variables.
    ///
    /// Required: `TWO_CHAT_API_KEY`, `TWO_CHAT_PHONE_NUMBER`.
    /// Optional: `TWO_CHAT_API_URL`.
    pub fn from_env() -> Result<Self, TwoChatError> {
        let api_key = env::var("TWO_CHAT_API_KEY")
            .map_err(|_| TwoChatError::Config("TWO_CHAT_API_KEY not set".to_string()))?;
        let phone_number = env::var("TWO_CHAT_PHONE_NUMBER")
            .map_err(|_| TwoChatError::Config("TWO_CHAT_PHONE_NUMBER not set".to_string()))?;

        let mut config = Self::new(api_key, phone_number);
        if let Ok(url) = env::var("TWO_CHAT_API_URL") {
            config.base_url = url;
        }
        Ok(config)
    }

    /// Build the URL for an endpoint path such as `/webhooks`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn info_url(&self) -> String {
        self.url("/info/")
    }

    pub fn send_message_url(&self) -> String {
        self.url("/whatsapp/send-message")
    }

    pub fn numbers_url(&self) -> String {
        self.url("/whatsapp/get-numbers")
    }

    pub fn webhooks_url(&self) -> String {
        self.url("/webhooks")
    }

    pub fn subscribe_url(&self, event_name: &str) -> String {
        self.url(&format!(
            "/webhooks/subscribe/{}",
            urlencoding::encode(event_name)
        ))
    }

    pub fn webhook_url(&self, uuid: &str) -> String {
        self.url(&format!("/webhooks/{}", urlencoding::encode(uuid)))
    }

    pub fn check_number_url(&self, phone_number: &str) -> String {
        self.url(&format!(
            "/whatsapp/check-number/{}",
            urlencoding::encode(phone_number)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = TwoChatConfig::new("key", "+5491100000000");
        assert_eq!(config.info_url(), "https://api.p.2chat.io/open/info/");
        assert_eq!(
            config.send_message_url(),
            "https://api.p.2chat.io/open/whatsapp/send-message"
        );
        assert_eq!(
            config.subscribe_url("message.received"),
            "https://api.p.2chat.io/open/webhooks/subscribe/message.received"
        );
        assert_eq!(
            config.check_number_url("+5491100000000"),
            "https://api.p.2chat.io/open/whatsapp/check-number/%2B5491100000000"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let config = TwoChatConfig::new("key", "+1").with_base_url("http://localhost:4000/");
        assert_eq!(config.webhook_url("abc"), "http://localhost:4000/webhooks/abc");
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_vars() {
            std::env::remove_var("TWO_CHAT_API_KEY");
            std::env::remove_var("TWO_CHAT_PHONE_NUMBER");
            std::env::remove_var("TWO_CHAT_API_URL");
        }

        clear_vars();
        match TwoChatConfig::from_env() {
            Err(TwoChatError::Config(msg)) => assert!(msg.contains("TWO_CHAT_API_KEY")),
            other => panic!("Expected Config error, got {:?}", other),
        }

        std::env::set_var("TWO_CHAT_API_KEY", "uak-1");
        match TwoChatConfig::from_env() {
            Err(TwoChatError::Config(msg)) => assert!(msg.contains("TWO_CHAT_PHONE_NUMBER")),
            other => panic!("Expected Config error, got {:?}", other),
        }

        std::env::set_var("TWO_CHAT_PHONE_NUMBER", "+5491100000000");
        std::env::set_var("TWO_CHAT_API_URL", "http://localhost:4000");
        let config = TwoChatConfig::from_env().unwrap();
        assert_eq!(config.api_key, "uak-1");
        assert_eq!(config.phone_number, "+5491100000000");
        assert_eq!(config.base_url, "http://localhost:4000");

        clear_vars();
    }
}
