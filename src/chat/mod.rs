//! Chess Q&A conversation engine.
//!
//! Organized into:
//! - `core`: configuration, errors, identifiers and the message model
//! - `guardrail`: topic filter, greeting detection and name extraction
//! - `session`: conversation state, context window and transcript export
//! - `prompt`: system instruction and per-turn prompt assembly
//! - `orchestrator`: routing of each user message through the branches

pub mod core;
pub mod guardrail;
pub mod orchestrator;
pub mod prompt;
pub mod session;

pub use self::core::{
    AgentConfig, AgentError, AgentResult, LlmConfig, Message, Role, ServerConfig, SessionConfig,
    SessionId, api_key_from_env,
};
pub use guardrail::{ChessGuardrail, GuardrailPolicy, NameExtractor, Verdict};
pub use orchestrator::{ResponseOrchestrator, TurnOutcome, TurnReply, TurnRoute};
pub use session::{ConversationSession, SessionStats, export_file_name, export_transcript};
