//! Per-user conversation state.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::chat::core::message::{Message, Role};
use crate::chat::session::context_window::ContextWindow;

/// Assistant message every session starts with.
pub const GREETING_MESSAGE: &str = "👋 Hello! I'm your Chess Q&A Bot!

Ask me anything about chess - rules, openings, strategies, famous players, tournaments, and chess history!";

/// Characters of each message shown in the history preview.
const PREVIEW_CHARS: usize = 50;

/// Snapshot of the session counters shown next to the chat.
#[derive(Clone, Debug, Serialize)]
pub struct SessionStats {
    /// Extracted user name, if any.
    pub user_name: Option<String>,
    /// Questions answered by the model.
    pub question_count: u32,
    /// Messages in the displayed history, seeded greeting included.
    pub message_count: usize,
    /// When the session was created.
    pub started_at: DateTime<Local>,
}

/// Conversation state for a single user.
///
/// Owned by exactly one caller at a time; turns are applied through `&mut self`.
#[derive(Clone, Debug)]
pub struct ConversationSession {
    messages: Vec<Message>,
    user_name: Option<String>,
    question_count: u32,
    started_at: DateTime<Local>,
    window: ContextWindow,
}

impl ConversationSession {
    /// Start a session seeded with the greeting message.
    #[must_use]
    pub fn new(window_capacity: usize) -> Self {
        Self {
            messages: vec![Message::assistant(GREETING_MESSAGE)],
            user_name: None,
            question_count: 0,
            started_at: Local::now(),
            window: ContextWindow::new(window_capacity),
        }
    }

    /// Append a message to the displayed history.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Store the user's name unless one is already known.
    ///
    /// Returns `true` if the name was stored.
    pub fn set_name_if_unset(&mut self, name: impl Into<String>) -> bool {
        if self.user_name.is_some() {
            return false;
        }
        self.user_name = Some(name.into());
        true
    }

    /// Count one answered question.
    pub const fn increment_question_count(&mut self) {
        self.question_count = self.question_count.saturating_add(1);
    }

    /// Push a completed exchange into the model context window.
    pub fn record_exchange(&mut self, user: Message, assistant: Message) {
        self.window.push(user, assistant);
    }

    /// Restore the freshly seeded state. Idempotent.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(Message::assistant(GREETING_MESSAGE));
        self.user_name = None;
        self.question_count = 0;
        self.window.clear();
    }

    /// Full displayed history, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Extracted user name.
    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Questions answered by the model.
    #[must_use]
    pub const fn question_count(&self) -> u32 {
        self.question_count
    }

    /// Messages in the displayed history.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Session creation time.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Recent exchanges sent to the model.
    #[must_use]
    pub const fn context_window(&self) -> &ContextWindow {
        &self.window
    }

    /// Whether anything beyond the seeded greeting exists.
    #[must_use]
    pub fn has_conversation(&self) -> bool {
        self.messages.len() > 1
    }

    /// Counter snapshot.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            user_name: self.user_name.clone(),
            question_count: self.question_count,
            message_count: self.messages.len(),
            started_at: self.started_at,
        }
    }

    /// One line per message after the seeded greeting, content cut to 50 characters.
    #[must_use]
    pub fn history_preview(&self) -> Vec<String> {
        self.messages
            .iter()
            .skip(1)
            .map(|m| {
                let label = match m.role() {
                    Role::User => "User",
                    Role::Assistant => "Assistant",
                };
                let snippet: String = m.content().chars().take(PREVIEW_CHARS).collect();
                format!("{label}: {snippet}...")
            })
            .collect()
    }
}
