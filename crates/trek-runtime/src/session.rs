//! One user's conversation: state, history, audit log, turn guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use trek_core::{Message, SessionId, ToolCallRecord, UserId};
use trek_state::SharedState;
use trek_tools::AuditSink;

/// Append-only log of completed tool invocations, owned by one session.
#[derive(Default)]
pub struct AuditLog {
    entries: Mutex<Vec<ToolCallRecord>>,
}

impl AuditLog {
    /// Copy of all records, in append order.
    #[must_use]
    pub fn entries(&self) -> Vec<ToolCallRecord> {
        self.entries.lock().clone()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl AuditSink for AuditLog {
    fn record(&self, record: ToolCallRecord) {
        self.entries.lock().push(record);
    }
}

/// One end-to-end conversation.
///
/// The session exclusively owns its [`SharedState`]; agents and tools
/// only ever hold scoped context handles. The turn guard serializes turns
/// — no two user messages for the same session are handled concurrently.
pub struct Session {
    id: SessionId,
    user_id: UserId,
    state: SharedState,
    history: RwLock<Vec<Message>>,
    audit: Arc<AuditLog>,
    turn_guard: tokio::sync::Mutex<()>,
    terminated: AtomicBool,
    cancellation: CancellationToken,
}

impl Session {
    /// Create a fresh session for `user_id`.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            state: SharedState::new(),
            history: RwLock::new(Vec::new()),
            audit: Arc::new(AuditLog::default()),
            turn_guard: tokio::sync::Mutex::new(()),
            terminated: AtomicBool::new(false),
            cancellation: CancellationToken::new(),
        }
    }

    /// Session ID.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The user this session belongs to.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The session's shared state handle.
    #[must_use]
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Copy of the conversation history, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Message> {
        self.history.read().clone()
    }

    /// Append one message to the history.
    pub fn push_message(&self, message: Message) {
        self.history.write().push(message);
    }

    /// Number of messages in the history.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.history.read().len()
    }

    /// The session's audit log.
    #[must_use]
    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    /// The audit log as a sink for the tool dispatcher.
    #[must_use]
    pub fn audit_sink(&self) -> Arc<dyn AuditSink> {
        self.audit.clone()
    }

    /// The turn guard. Held for the duration of one turn.
    pub(crate) fn turn_guard(&self) -> &tokio::sync::Mutex<()> {
        &self.turn_guard
    }

    /// Session-level cancellation token; child tokens bound tool calls.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Whether the session has been terminated.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Terminate the session: no further turns run, in-flight work is
    /// cancelled, history and state stay readable.
    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::SeqCst);
        self.cancellation.cancel();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use trek_core::{ToolCallId, ToolOutcome};

    use super::*;

    fn make_record(session_id: SessionId) -> ToolCallRecord {
        ToolCallRecord {
            id: ToolCallId::new(),
            session_id,
            tool_name: "search_hotels".into(),
            arguments: json!({"location": "Singapore"}),
            agent: Some("hotels".into()),
            requested_at: chrono::Utc::now(),
            outcome: ToolOutcome::Success(json!({"resultCount": 0})),
            duration_ms: 3,
        }
    }

    #[test]
    fn fresh_session_is_empty_and_live() {
        let session = Session::new(UserId::new());
        assert_eq!(session.message_count(), 0);
        assert!(session.audit().is_empty());
        assert!(!session.is_terminated());
        assert!(session.state().active_agent().is_none());
    }

    #[test]
    fn history_is_append_only_ordered() {
        let session = Session::new(UserId::new());
        session.push_message(Message::user("plan a trip"));
        session.push_message(Message::agent("planner", "where to?"));
        session.push_message(Message::user("Singapore"));

        let history = session.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "plan a trip");
        assert_eq!(history[2].content, "Singapore");
    }

    #[test]
    fn audit_log_records_through_sink() {
        let session = Session::new(UserId::new());
        let sink = session.audit_sink();
        sink.record(make_record(session.id().clone()));
        sink.record(make_record(session.id().clone()));

        assert_eq!(session.audit().len(), 2);
        assert_eq!(session.audit().entries()[0].tool_name, "search_hotels");
    }

    #[test]
    fn terminate_cancels_and_sticks() {
        let session = Session::new(UserId::new());
        session.terminate();
        assert!(session.is_terminated());
        assert!(session.cancellation().is_cancelled());
        // Terminal: stays terminated.
        session.terminate();
        assert!(session.is_terminated());
    }

    #[test]
    fn state_survives_termination_read_only_by_convention() {
        let session = Session::new(UserId::new());
        let _ = session.state().set("trip.destination", json!("Osaka")).unwrap();
        session.terminate();
        assert_eq!(
            session.state().get("trip.destination"),
            Some(json!("Osaka"))
        );
    }
}
