//! Runtime error types.

use thiserror::Error;

/// Errors that can occur while running sessions and turns.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Session not found.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Session is busy (another turn is running).
    #[error("session busy: {0}")]
    SessionBusy(String),

    /// Session has been terminated and is read-only history.
    #[error("session terminated: {0}")]
    SessionTerminated(String),

    /// The agent decision function exceeded its timeout.
    #[error("decision timed out after {timeout_ms}ms")]
    DecisionTimeout {
        /// The timeout that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// Internal / unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RuntimeError {
    /// Whether the caller can usefully retry.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::SessionBusy(_) | Self::DecisionTimeout { .. } => true,
            Self::SessionNotFound(_) | Self::SessionTerminated(_) | Self::Internal(_) => false,
        }
    }

    /// Error category string for logging.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::SessionNotFound(_) => "session_not_found",
            Self::SessionBusy(_) => "session_busy",
            Self::SessionTerminated(_) => "session_terminated",
            Self::DecisionTimeout { .. } => "decision_timeout",
            Self::Internal(_) => "internal",
        }
    }
}
