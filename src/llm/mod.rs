//! Model boundary: the `ChatModel` seam and its Groq implementation.

pub mod errors;
pub mod groq;

pub use errors::{LlmError, LlmResult};
pub use groq::GroqChatModel;

use std::future::Future;
use std::pin::Pin;

use crate::chat::core::message::Message;

/// Boxed future type for model calls.
pub type CompletionFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Everything the model sees for one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionPrompt {
    /// System instruction.
    pub system: String,
    /// Prior exchanges, oldest first.
    pub history: Vec<Message>,
    /// The new user input.
    pub input: String,
}

/// Trait abstraction over hosted chat models.
pub trait ChatModel: Send + Sync {
    /// Produce a completion for the prompt.
    ///
    /// # Errors
    /// Returns a classified error if the call fails.
    fn complete(&self, prompt: CompletionPrompt) -> CompletionFuture<'_, LlmResult<String>>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
