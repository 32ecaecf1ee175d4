//! Core chat types and identifiers.

pub mod config;
pub mod errors;
pub mod ids;
pub mod message;

pub use config::{AgentConfig, LlmConfig, ServerConfig, SessionConfig, api_key_from_env};
pub use errors::{AgentError, AgentResult};
pub use ids::SessionId;
pub use message::{Message, Role};
