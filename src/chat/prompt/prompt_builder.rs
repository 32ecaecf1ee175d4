//! Prompt construction for the model branch.

use crate::chat::session::conversation::ConversationSession;
use crate::llm::CompletionPrompt;

/// Chess assistant persona.
pub const SYSTEM_PROMPT: &str = "You are an expert chess assistant with deep knowledge of chess rules, strategies, openings, endgames, famous players, and chess history.

Your responses should be:
- Accurate and factual about chess
- Clear and concise (2-4 sentences typically, longer for complex topics)
- Educational and friendly in tone
- Well-structured with proper formatting
- Only about chess topics
- Personalized with user's name when available

When explaining moves, use standard algebraic notation (e.g., e4, Nf3, O-O).
When discussing players, include relevant context like nationality and era.
Provide examples when explaining tactics or strategies.";

/// System instruction, with a personalization line when the name is known.
#[must_use]
pub fn build_system_prompt(user_name: Option<&str>) -> String {
    let mut out = String::from(SYSTEM_PROMPT);
    if let Some(name) = user_name {
        out.push_str("\n\nThe user's name is ");
        out.push_str(name);
        out.push_str(". Use their name naturally in your responses when appropriate.");
    }
    out
}

/// Assemble persona, context window and new input for one model call.
#[must_use]
pub fn build_completion_prompt(session: &ConversationSession, input: &str) -> CompletionPrompt {
    CompletionPrompt {
        system: build_system_prompt(session.user_name()),
        history: session.context_window().messages(),
        input: input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::core::message::Message;

    #[test]
    fn test_system_prompt_without_name() {
        assert_eq!(build_system_prompt(None), SYSTEM_PROMPT);
    }

    #[test]
    fn test_system_prompt_with_name() {
        let prompt = build_system_prompt(Some("Alice"));
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.ends_with(
            "\n\nThe user's name is Alice. Use their name naturally in your responses when appropriate."
        ));
    }

    #[test]
    fn test_completion_prompt_uses_window() {
        let mut session = ConversationSession::new(10);
        session.record_exchange(Message::user("What is a pin?"), Message::assistant("A pin..."));
        session.set_name_if_unset("Alice");

        let prompt = build_completion_prompt(&session, "And a skewer?");
        assert_eq!(prompt.history.len(), 2);
        assert_eq!(prompt.input, "And a skewer?");
        assert!(prompt.system.contains("Alice"));
    }
}
