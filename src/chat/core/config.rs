//! Configuration for the chess agent.

use std::env::VarError;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::chat::core::errors::{AgentError, AgentResult};

/// Environment variable holding the Groq API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable for the HTTP server port.
pub const PORT_ENV: &str = "CHESS_AGENT_PORT";

/// Top-level configuration for the agent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Completion model settings.
    pub llm: LlmConfig,
    /// Session memory settings.
    pub session: SessionConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

impl AgentConfig {
    /// Build the default configuration, applying environment overrides.
    ///
    /// Loads a `.env` file from the working directory first when one exists.
    #[must_use]
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let mut config = Self::default();
        if let Some(port) = port_from(std::env::var(PORT_ENV)) {
            config.server.port = port;
        }
        config
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> AgentResult<()> {
        if self.llm.model.trim().is_empty() {
            return Err(AgentError::InvalidConfig(
                "llm.model must not be empty".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AgentError::InvalidConfig(
                "llm.temperature must be within 0.0..=2.0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(AgentError::InvalidConfig(
                "llm.max_tokens must be > 0".to_string(),
            ));
        }

        if self.session.window == 0 {
            return Err(AgentError::InvalidConfig(
                "session.window must be > 0".to_string(),
            ));
        }

        if self.server.idle_ttl_secs == 0 {
            return Err(AgentError::InvalidConfig(
                "server.idle_ttl_secs must be > 0".to_string(),
            ));
        }

        if let Some(base_url) = &self.llm.base_url {
            Url::parse(base_url)?;
        }

        Ok(())
    }
}

/// Read the provider API key from the environment.
///
/// # Errors
/// Returns [`AgentError::MissingApiKey`] when the variable is unset or blank.
pub fn api_key_from_env() -> AgentResult<String> {
    api_key_from(std::env::var(API_KEY_ENV))
}

fn api_key_from(value: Result<String, VarError>) -> AgentResult<String> {
    match value {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(AgentError::MissingApiKey(API_KEY_ENV)),
    }
}

fn port_from(value: Result<String, VarError>) -> Option<u16> {
    let raw = value.ok()?;
    match raw.trim().parse() {
        Ok(port) => Some(port),
        Err(e) => {
            warn!("Ignoring {PORT_ENV}={raw:?}: {e}");
            None
        }
    }
}

/// Completion model settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Groq model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum output tokens per completion.
    pub max_tokens: u64,
    /// Optional custom base URL.
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            base_url: None,
        }
    }
}

/// Session memory settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of recent exchanges sent to the model as context.
    pub window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { window: 10 }
    }
}

/// HTTP server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Sessions untouched for this many seconds are dropped by the sweeper.
    pub idle_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            idle_ttl_secs: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_fatal() {
        assert!(matches!(
            api_key_from(Err(VarError::NotPresent)),
            Err(AgentError::MissingApiKey(API_KEY_ENV))
        ));
        assert!(matches!(
            api_key_from(Ok("   ".to_string())),
            Err(AgentError::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_api_key_accepted() {
        assert_eq!(api_key_from(Ok("gsk_test".to_string())).unwrap(), "gsk_test");
    }

    #[test]
    fn test_port_override() {
        assert_eq!(port_from(Ok("8080".to_string())), Some(8080));
        assert_eq!(port_from(Ok(" 4000 ".to_string())), Some(4000));
        assert_eq!(port_from(Ok("not-a-port".to_string())), None);
        assert_eq!(port_from(Ok("70000".to_string())), None);
        assert_eq!(port_from(Err(VarError::NotPresent)), None);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session.window, 10);
        assert_eq!(config.llm.max_tokens, 1024);
    }

    #[test]
    fn test_zero_idle_ttl_rejected() {
        let mut config = AgentConfig::default();
        config.server.idle_ttl_secs = 0;
        assert!(matches!(config.validate(), Err(AgentError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = AgentConfig::default();
        config.session.window = 0;
        assert!(matches!(
            config.validate(),
            Err(AgentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = AgentConfig::default();
        config.llm.base_url = Some("not a url".to_string());
        assert!(matches!(config.validate(), Err(AgentError::Url(_))));
    }

    #[test]
    fn test_temperature_out_of_range() {
        let mut config = AgentConfig::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }
}
