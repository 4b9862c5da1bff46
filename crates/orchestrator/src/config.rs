//! Orchestrator configuration.

use std::env;
use std::time::Duration;

use crate::error::OrchestratorError;

/// Default number of decision steps per food-logging turn.
pub const DEFAULT_MAX_STEPS: usize = 2;

/// Default timeout for a single model call.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Tunables for turn processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Maximum decision steps in the food-logging loop.
    pub max_steps: usize,

    /// Timeout applied to every model call.
    pub llm_timeout: Duration,

    /// Use the reported age in the calorie estimate instead of a fixed one.
    pub use_reported_age: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            use_reported_age: false,
        }
    }
}

impl OrchestratorConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional:
    /// - `NUTRITION_MAX_STEPS` (default: 2)
    /// - `NUTRITION_LLM_TIMEOUT_SECS` (default: 60)
    /// - `NUTRITION_USE_REPORTED_AGE` (default: false)
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("NUTRITION_MAX_STEPS") {
            config.max_steps = raw
                .trim()
                .parse()
                .ok()
                .filter(|steps: &usize| *steps > 0)
                .ok_or_else(|| {
                    OrchestratorError::Config(format!("invalid NUTRITION_MAX_STEPS: '{}'", raw))
                })?;
        }

        if let Ok(raw) = env::var("NUTRITION_LLM_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                OrchestratorError::Config(format!("invalid NUTRITION_LLM_TIMEOUT_SECS: '{}'", raw))
            })?;
            config.llm_timeout = Duration::from_secs(secs);
        }

        if let Ok(raw) = env::var("NUTRITION_USE_REPORTED_AGE") {
            config.use_reported_age = matches!(
                raw.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        Ok(config)
    }

    /// Create a new config builder.
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }
}

/// Builder for OrchestratorConfig.
#[derive(Debug, Default)]
pub struct OrchestratorConfigBuilder {
    config: OrchestratorConfig,
}

impl OrchestratorConfigBuilder {
    pub fn max_steps(mut self, steps: usize) -> Self {
        self.config.max_steps = steps.max(1);
        self
    }

    pub fn llm_timeout(mut self, timeout: Duration) -> Self {
        self.config.llm_timeout = timeout;
        self
    }

    pub fn use_reported_age(mut self, enabled: bool) -> Self {
        self.config.use_reported_age = enabled;
        self
    }

    pub fn build(self) -> OrchestratorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = OrchestratorConfig::builder()
            .max_steps(0)
            .llm_timeout(Duration::from_millis(50))
            .use_reported_age(true)
            .build();
        assert_eq!(config.max_steps, 1);
        assert_eq!(config.llm_timeout, Duration::from_millis(50));
        assert!(config.use_reported_age);
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_vars() {
            std::env::remove_var("NUTRITION_MAX_STEPS");
            std::env::remove_var("NUTRITION_LLM_TIMEOUT_SECS");
            std::env::remove_var("NUTRITION_USE_REPORTED_AGE");
        }

        clear_vars();
        assert_eq!(OrchestratorConfig::from_env().unwrap(), OrchestratorConfig::default());

        std::env::set_var("NUTRITION_MAX_STEPS", "3");
        std::env::set_var("NUTRITION_LLM_TIMEOUT_SECS", "10");
        std::env::set_var("NUTRITION_USE_REPORTED_AGE", "true");
        let config = OrchestratorConfig::from_env().unwrap();
        assert_eq!(config.max_steps, 3);
        assert_eq!(config.llm_timeout, Duration::from_secs(10));
        assert!(config.use_reported_age);

        std::env::set_var("NUTRITION_MAX_STEPS", "0");
        assert!(matches!(
            OrchestratorConfig::from_env(),
            Err(OrchestratorError::Config(_))
        ));

        std::env::set_var("NUTRITION_MAX_STEPS", "2");
        std::env::set_var("NUTRITION_LLM_TIMEOUT_SECS", "soon");
        assert!(matches!(
            OrchestratorConfig::from_env(),
            Err(OrchestratorError::Config(_))
        ));

        clear_vars();
    }
}
