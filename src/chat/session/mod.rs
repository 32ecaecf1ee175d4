//! Conversation session state, context window and transcript export.

pub mod context_window;
pub mod conversation;
pub mod export;

pub use context_window::{ContextWindow, Exchange};
pub use conversation::{ConversationSession, GREETING_MESSAGE, SessionStats};
pub use export::{export_file_name, export_transcript};
