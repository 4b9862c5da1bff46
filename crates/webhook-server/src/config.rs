//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Default bind address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Webhook server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SERVER_ADDR` | Server bind address | `0.0.0.0:3000` |
    ///
    /// The 2Chat, Deepgram, OpenAI and orchestrator settings are read by
    /// their own crates.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = raw
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(raw.clone()))?;
        Ok(Self { addr })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SERVER_ADDR: {0}")]
    InvalidAddr(String),
}
