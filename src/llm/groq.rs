//! Groq chat completions through the Rig provider.

use reqwest::Client as ReqwestClient;
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::message::{AssistantContent, Message as RigMessage};
use rig::providers::groq;
use tracing::debug;

use crate::chat::core::config::LlmConfig;
use crate::chat::core::message::{Message, Role};
use crate::llm::errors::{LlmError, LlmResult};
use crate::llm::{ChatModel, CompletionFuture, CompletionPrompt};

type GroqCompletionModel = groq::CompletionModel<ReqwestClient>;

/// Hosted chat model served by Groq.
pub struct GroqChatModel {
    model: GroqCompletionModel,
    model_name: String,
    temperature: f64,
    max_tokens: u64,
}

impl GroqChatModel {
    /// Create a Groq client from config and an API key.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig, api_key: &str) -> LlmResult<Self> {
        let builder = groq::Client::<ReqwestClient>::builder().api_key(api_key);
        let builder = if let Some(base_url) = &config.base_url {
            builder.base_url(base_url)
        } else {
            builder
        };
        let client = builder
            .build()
            .map_err(|e| LlmError::Other(format!("failed to build Groq client: {e}")))?;
        let model = client.completion_model(config.model.clone());

        Ok(Self {
            model,
            model_name: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

impl ChatModel for GroqChatModel {
    fn complete(&self, prompt: CompletionPrompt) -> CompletionFuture<'_, LlmResult<String>> {
        Box::pin(async move {
            let history: Vec<RigMessage> = prompt.history.iter().map(to_rig_message).collect();
            debug!(
                "Sending completion to {} with {} context messages",
                self.model_name,
                history.len()
            );

            let request = self
                .model
                .completion_request(prompt.input)
                .preamble(prompt.system)
                .messages(history)
                .temperature(self.temperature)
                .max_tokens(self.max_tokens)
                .build();

            let response = self.model.completion(request).await?;
            Ok(extract_text(&response.choice))
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn to_rig_message(message: &Message) -> RigMessage {
    match message.role() {
        Role::User => RigMessage::user(message.content()),
        Role::Assistant => RigMessage::assistant(message.content()),
    }
}

fn extract_text(choice: &rig::OneOrMany<AssistantContent>) -> String {
    let mut out = String::new();
    for content in choice.iter() {
        if let AssistantContent::Text(text) = content {
            out.push_str(&text.text);
        }
    }
    out
}
