//! Bare greeting detection and canned greeting replies.

/// Utterances treated as a bare greeting after trimming and lowercasing.
pub const SIMPLE_GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
    "howdy",
    "hiya",
    "yo",
];

/// Whether the whole input is a bare greeting.
///
/// Strict equality: "hi there, how are you" is not a greeting here; the guardrail's
/// leading-greeting rule lets it through instead.
#[must_use]
pub fn is_greeting(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    SIMPLE_GREETINGS.contains(&normalized.as_str())
}

/// Canned reply to a bare greeting, personalized when the name is known.
#[must_use]
pub fn greeting_response(user_name: Option<&str>) -> String {
    match user_name {
        Some(name) => format!("Hello again, {name}! 👋 How can I help you with chess today?"),
        None => "Hello! 👋 Welcome to the Chess Q&A Bot! Feel free to introduce yourself or ask me any chess-related questions!".to_string(),
    }
}
