//! Turn orchestration: greeting, guardrail and model branches.
//!
//! Every user message goes through the same pipeline:
//! 1. the message is appended and, while no name is stored, the name extractor runs;
//! 2. a [`TurnRoute`] is chosen (greeting, then guardrail, then model);
//! 3. the branch produces the assistant reply, which is appended and pushed into the
//!    context window.
//!
//! Only a successful model answer counts as a question.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chat::core::config::AgentConfig;
use crate::chat::core::errors::AgentResult;
use crate::chat::core::message::Message;
use crate::chat::guardrail::{
    ChessGuardrail, GuardrailPolicy, NameExtractor, REJECTION_MESSAGE, greeting_response,
    is_greeting,
};
use crate::chat::prompt::build_completion_prompt;
use crate::chat::session::conversation::ConversationSession;
use crate::llm::{ChatModel, LlmError};

/// Branch chosen for a turn. Exactly one applies.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRoute {
    /// Bare greeting; answered with a canned reply.
    Greeting,
    /// Off-topic; answered with the rejection text.
    Rejected,
    /// Forwarded to the model.
    Model,
}

/// What happened on a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Canned greeting sent.
    Greeted,
    /// Rejection text sent.
    Rejected,
    /// Model answered; the question counter moved.
    Answered,
    /// Model call failed; an error notice was sent instead.
    Failed(LlmError),
}

impl TurnOutcome {
    /// Stable label for logs and API payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Greeted => "greeted",
            Self::Rejected => "rejected",
            Self::Answered => "answered",
            Self::Failed(LlmError::Authentication(_)) => "authentication_error",
            Self::Failed(LlmError::RateLimited(_)) => "rate_limited",
            Self::Failed(LlmError::Other(_)) => "error",
        }
    }
}

/// Result of processing one user message.
#[derive(Clone, Debug)]
pub struct TurnReply {
    /// Branch taken.
    pub route: TurnRoute,
    /// Branch result.
    pub outcome: TurnOutcome,
    /// Assistant text appended to the session.
    pub text: String,
}

/// Routes user input and applies the result to a session.
pub struct ResponseOrchestrator {
    guardrail: ChessGuardrail,
    names: NameExtractor,
    model: Arc<dyn ChatModel>,
    window: usize,
}

impl ResponseOrchestrator {
    /// Build an orchestrator with the default guardrail vocabulary.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or a pattern fails to compile.
    pub fn new(model: Arc<dyn ChatModel>, config: &AgentConfig) -> AgentResult<Self> {
        Self::with_policy(model, config, &GuardrailPolicy::default())
    }

    /// Build an orchestrator with a custom guardrail vocabulary.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or a pattern fails to compile.
    pub fn with_policy(
        model: Arc<dyn ChatModel>,
        config: &AgentConfig,
        policy: &GuardrailPolicy,
    ) -> AgentResult<Self> {
        config.validate()?;
        Ok(Self {
            guardrail: ChessGuardrail::new(policy)?,
            names: NameExtractor::new()?,
            model,
            window: config.session.window,
        })
    }

    /// Start a fresh session sized for this orchestrator's context window.
    #[must_use]
    pub fn new_session(&self) -> ConversationSession {
        ConversationSession::new(self.window)
    }

    /// Choose the branch for an input. Pure.
    #[must_use]
    pub fn route(&self, input: &str) -> TurnRoute {
        if is_greeting(input) {
            TurnRoute::Greeting
        } else if self.guardrail.is_chess_related(input) {
            TurnRoute::Model
        } else {
            TurnRoute::Rejected
        }
    }

    /// Process one user message against the session.
    pub async fn respond(&self, session: &mut ConversationSession, input: &str) -> TurnReply {
        session.append(Message::user(input));

        if session.user_name().is_none() {
            if let Some(name) = self.names.extract_name(input) {
                info!("Learned user name: {name}");
                session.set_name_if_unset(name);
            }
        }

        let route = self.route(input);
        debug!(?route, "routing turn");

        let (outcome, text) = match route {
            TurnRoute::Greeting => (TurnOutcome::Greeted, greeting_response(session.user_name())),
            TurnRoute::Rejected => (TurnOutcome::Rejected, REJECTION_MESSAGE.to_string()),
            TurnRoute::Model => self.ask_model(session, input).await,
        };

        session.append(Message::assistant(text.clone()));
        session.record_exchange(Message::user(input), Message::assistant(text.clone()));

        TurnReply {
            route,
            outcome,
            text,
        }
    }

    async fn ask_model(
        &self,
        session: &mut ConversationSession,
        input: &str,
    ) -> (TurnOutcome, String) {
        let prompt = build_completion_prompt(session, input);

        match self.model.complete(prompt).await {
            Ok(answer) => {
                session.increment_question_count();
                (TurnOutcome::Answered, answer.trim().to_string())
            }
            Err(err) => {
                warn!("Model {} failed: {err}", self.model.model_name());
                let notice = err.user_message();
                (TurnOutcome::Failed(err), notice)
            }
        }
    }
}
