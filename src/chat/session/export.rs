//! Plain-text transcript export.

use chrono::{DateTime, Local};

use crate::chat::session::conversation::ConversationSession;

/// Timestamp layout used in transcript headers.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SEPARATOR_WIDTH: usize = 60;

/// Render the whole session as a numbered transcript.
#[must_use]
pub fn export_transcript(session: &ConversationSession, exported_at: DateTime<Local>) -> String {
    let mut out = format!(
        "\n# Chess Q&A Chatbot - Conversation History\n\
         # Session Started: {}\n\
         # User: {}\n\
         # Total Questions: {}\n\
         # Export Time: {}\n\n\
         {}\n\n",
        session.started_at().format(TIMESTAMP_FORMAT),
        session.user_name().unwrap_or("Anonymous"),
        session.question_count(),
        exported_at.format(TIMESTAMP_FORMAT),
        "=".repeat(SEPARATOR_WIDTH),
    );

    for (idx, message) in session.messages().iter().enumerate() {
        out.push_str(&format!(
            "{}. [{}]\n{}\n\n",
            idx + 1,
            message.role().as_str().to_uppercase(),
            message.content()
        ));
    }

    out
}

/// Suggested download file name for the transcript.
#[must_use]
pub fn export_file_name(session: &ConversationSession) -> String {
    format!("chess_chat_{}.txt", session.user_name().unwrap_or("anonymous"))
}
