//! The agent decision seam.
//!
//! A [`DecisionAgent`] is the opaque reasoning function behind every
//! registered agent: given the conversation so far, a state snapshot, and
//! a scoped tool dispatcher, it produces a reply and says whether it keeps
//! or relinquishes ownership of the conversation. It can only reach shared
//! state through the tools it invokes — never directly.

use async_trait::async_trait;
use trek_core::Message;
use trek_state::StateSnapshot;
use trek_tools::ToolDispatcher;

use crate::errors::AgentError;

/// Everything a decision function may look at for one turn.
pub struct TurnInput<'a> {
    /// Conversation history, oldest first. The last entry is the user
    /// message being answered.
    pub history: &'a [Message],
    /// Immutable shared-state snapshot taken at turn start.
    pub snapshot: StateSnapshot,
    /// Scoped tool dispatch; every call is audited on the owning session.
    pub tools: &'a ToolDispatcher,
}

impl TurnInput<'_> {
    /// The content of the most recent user message, if any.
    #[must_use]
    pub fn last_user_message(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|m| m.role == trek_core::Role::User)
            .map(|m| m.content.as_str())
    }
}

/// What a decision function returns: the reply text and whether the agent
/// keeps the conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    /// The reply to show the user.
    pub reply: String,
    /// `true` hands control back to the orchestrator (explicit signal,
    /// never an exception path).
    pub relinquish: bool,
}

impl Decision {
    /// Reply and keep ownership of the conversation.
    #[must_use]
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            relinquish: false,
        }
    }

    /// Reply and hand control back to the orchestrator.
    #[must_use]
    pub fn finish(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            relinquish: true,
        }
    }
}

/// The opaque per-agent decision function.
///
/// Implementations wrap whatever reasoning backend the agent uses; the
/// orchestrator only requires that the call is awaitable (it is invoked
/// under a timeout) and that state mutation happens exclusively through
/// the provided tools.
#[async_trait]
pub trait DecisionAgent: Send + Sync {
    /// Produce the agent's reply for one turn.
    async fn decide(&self, input: TurnInput<'_>) -> Result<Decision, AgentError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_util::sync::CancellationToken;
    use trek_core::{Message, SessionId, ToolCallRecord};
    use trek_state::SharedState;
    use trek_tools::{AuditSink, ToolInvoker, ToolRegistry};

    use super::*;

    struct NullSink;

    impl AuditSink for NullSink {
        fn record(&self, _record: ToolCallRecord) {}
    }

    fn make_dispatcher() -> ToolDispatcher {
        ToolDispatcher::new(
            Arc::new(ToolInvoker::new(Arc::new(ToolRegistry::new()))),
            SharedState::new(),
            SessionId::new(),
            None,
            Arc::new(NullSink),
            CancellationToken::new(),
        )
    }

    #[test]
    fn reply_keeps_ownership() {
        let d = Decision::reply("looking into flights now");
        assert!(!d.relinquish);
        assert_eq!(d.reply, "looking into flights now");
    }

    #[test]
    fn finish_relinquishes() {
        let d = Decision::finish("all booked, handing back");
        assert!(d.relinquish);
    }

    #[test]
    fn last_user_message_skips_agent_replies() {
        let history = vec![
            Message::user("find me a hotel"),
            Message::agent("hotels", "searching"),
            Message::user("near the marina please"),
        ];
        let tools = make_dispatcher();
        let input = TurnInput {
            history: &history,
            snapshot: SharedState::new().snapshot(),
            tools: &tools,
        };
        assert_eq!(input.last_user_message(), Some("near the marina please"));
    }

    #[test]
    fn last_user_message_empty_history() {
        let tools = make_dispatcher();
        let input = TurnInput {
            history: &[],
            snapshot: SharedState::new().snapshot(),
            tools: &tools,
        };
        assert!(input.last_user_message().is_none());
    }
}
