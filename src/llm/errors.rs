//! Failures reported by the model boundary.

use thiserror::Error;

/// Classified model failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LlmError {
    /// The provider rejected the credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// The provider is throttling requests.
    #[error("rate limited: {0}")]
    RateLimited(String),
    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl LlmError {
    /// Classify a raw failure description by its wording.
    #[must_use]
    pub fn classify(description: impl Into<String>) -> Self {
        let description = description.into();
        let lowered = description.to_lowercase();

        if lowered.contains("api key") || lowered.contains("unauthorized") {
            Self::Authentication(description)
        } else if lowered.contains("rate limit") {
            Self::RateLimited(description)
        } else {
            Self::Other(description)
        }
    }

    /// Message shown to the user in place of a model answer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication(_) => {
                "🔑 **Authentication Error**: Invalid API key. Please check your .env file."
                    .to_string()
            }
            Self::RateLimited(_) => {
                "⏱️ **Rate Limit**: Too many requests. Please wait a moment.".to_string()
            }
            Self::Other(description) => format!("⚠️ **Error**: {description}"),
        }
    }
}

impl From<rig::completion::CompletionError> for LlmError {
    fn from(value: rig::completion::CompletionError) -> Self {
        Self::classify(value.to_string())
    }
}

/// Convenience result alias for model calls.
pub type LlmResult<T> = Result<T, LlmError>;
