//! Error types for agent configuration and startup.

use thiserror::Error;

use crate::llm::LlmError;

/// Agent error type.
///
/// Per-turn model failures never surface here; the orchestrator turns them into
/// assistant messages. These errors stop the process before a session begins.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The provider API key is not set in the environment.
    #[error("{0} is not set; create a .env file with {0}=your-api-key-here")]
    MissingApiKey(&'static str),
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// Regex compilation error.
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
    /// LLM client construction error.
    #[error("llm client error: {0}")]
    Llm(#[from] LlmError),
}

/// Convenience result alias for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;
