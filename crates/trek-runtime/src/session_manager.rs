//! Session manager — create, run, and end sessions.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, instrument};
use trek_core::{SessionId, UserId};
use trek_tools::ToolInvoker;

use crate::errors::RuntimeError;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use crate::turn::{self, TurnReply};

/// Tunables for turn execution.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    /// Timeout for one agent decision call, in milliseconds.
    pub decision_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            decision_timeout_ms: 30_000,
        }
    }
}

/// The map of live sessions and the session API the frontend boundary
/// calls.
///
/// Sessions never share state with each other, so the manager needs no
/// cross-session locking; the per-session turn guard is the only
/// serialization point.
pub struct SessionManager {
    sessions: DashMap<SessionId, Arc<Session>>,
    orchestrator: Arc<Orchestrator>,
    invoker: Arc<ToolInvoker>,
    config: RuntimeConfig,
}

impl SessionManager {
    /// Create a manager over shared (session-data-free) collaborators.
    #[must_use]
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        invoker: Arc<ToolInvoker>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            orchestrator,
            invoker,
            config,
        }
    }

    /// Start a session for `user_id` and return its ID.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub fn start_session(&self, user_id: UserId) -> SessionId {
        let session = Arc::new(Session::new(user_id));
        let id = session.id().clone();
        let _ = self.sessions.insert(id.clone(), session);
        debug!(session_id = %id, "session started");
        id
    }

    /// Look up a session.
    #[must_use]
    pub fn get(&self, session_id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.get(session_id).map(|s| s.clone())
    }

    /// Run one user turn against a session.
    #[instrument(skip(self, text), fields(session_id = %session_id))]
    pub async fn post_message(
        &self,
        session_id: &SessionId,
        text: String,
    ) -> Result<TurnReply, RuntimeError> {
        let session = self
            .get(session_id)
            .ok_or_else(|| RuntimeError::SessionNotFound(session_id.to_string()))?;

        let timeout = Duration::from_millis(self.config.decision_timeout_ms);
        turn::run_turn(&session, &self.orchestrator, &self.invoker, timeout, text).await
    }

    /// End a session. It stays readable as history; further turns fail.
    pub fn end_session(&self, session_id: &SessionId) -> Result<(), RuntimeError> {
        let session = self
            .get(session_id)
            .ok_or_else(|| RuntimeError::SessionNotFound(session_id.to_string()))?;
        session.terminate();
        debug!(session_id = %session_id, "session ended");
        Ok(())
    }

    /// Number of live (non-terminated) sessions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|entry| !entry.value().is_terminated())
            .count()
    }

    /// Total sessions held, including terminated ones.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The orchestrator routing decisions run through.
    #[must_use]
    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }
}
