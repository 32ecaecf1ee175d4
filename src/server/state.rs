//! Application state shared across all request handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::chat::core::config::{AgentConfig, api_key_from_env};
use crate::chat::core::errors::AgentResult;
use crate::chat::core::ids::SessionId;
use crate::chat::orchestrator::ResponseOrchestrator;
use crate::chat::session::conversation::ConversationSession;
use crate::llm::{ChatModel, GroqChatModel};

/// A session guarded for one turn at a time.
pub type SharedSession = Arc<Mutex<ConversationSession>>;

struct SessionSlot {
    session: SharedSession,
    last_seen: Instant,
}

/// Shared application state.
///
/// Clients normally tear sessions down with `DELETE`; abandoned ones are
/// dropped by [`AppState::prune_idle`] once they exceed the idle TTL.
pub struct AppState {
    /// Turn router shared by every session.
    pub orchestrator: ResponseOrchestrator,
    sessions: DashMap<SessionId, SessionSlot>,
    idle_ttl: Duration,
}

impl AppState {
    /// Create state backed by the Groq model.
    ///
    /// # Errors
    /// Returns an error if the API key is missing, the configuration is invalid, or
    /// the client cannot be built.
    pub fn new(config: &AgentConfig) -> AgentResult<Arc<Self>> {
        let api_key = api_key_from_env()?;
        let model = GroqChatModel::new(&config.llm, &api_key)?;
        Self::with_model(Arc::new(model), config)
    }

    /// Create state around any chat model.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn with_model(model: Arc<dyn ChatModel>, config: &AgentConfig) -> AgentResult<Arc<Self>> {
        let orchestrator = ResponseOrchestrator::new(model, config)?;
        Ok(Arc::new(Self {
            orchestrator,
            sessions: DashMap::new(),
            idle_ttl: Duration::from_secs(config.server.idle_ttl_secs),
        }))
    }

    /// Open a new seeded session.
    pub fn create_session(&self) -> (SessionId, SharedSession) {
        let id = SessionId::new();
        let session = Arc::new(Mutex::new(self.orchestrator.new_session()));
        self.sessions.insert(
            id,
            SessionSlot {
                session: Arc::clone(&session),
                last_seen: Instant::now(),
            },
        );
        tracing::info!("Opened session {id}");
        (id, session)
    }

    /// Look up a session and mark it active.
    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<SharedSession> {
        self.sessions.get_mut(&id).map(|mut slot| {
            slot.last_seen = Instant::now();
            Arc::clone(&slot.session)
        })
    }

    /// Tear down a session. Returns `false` if it did not exist.
    pub fn remove_session(&self, id: SessionId) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            tracing::info!("Closed session {id}");
        }
        removed
    }

    /// Number of live sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Configured idle TTL.
    #[must_use]
    pub const fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Drop sessions untouched for at least `max_idle`. Returns how many were dropped.
    ///
    /// A turn already holding its session finishes normally; only the registry entry goes.
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, slot| slot.last_seen.elapsed() < max_idle);
        let pruned = before.saturating_sub(self.sessions.len());
        if pruned > 0 {
            tracing::info!("Pruned {pruned} idle sessions");
        }
        pruned
    }
}
