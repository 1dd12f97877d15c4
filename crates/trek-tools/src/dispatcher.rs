//! Per-turn tool dispatch for agents.
//!
//! A [`ToolDispatcher`] is handed to the active agent's decision logic for
//! the duration of one turn. Every call builds a fresh [`ToolContext`],
//! runs through the invoker, and lands the completed record in the owning
//! session's audit log via the [`AuditSink`] — auditability does not
//! depend on success.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use trek_core::{SessionId, ToolCallId, ToolCallRecord, ToolOutcome};
use trek_state::SharedState;

use crate::invoker::{ToolInvoker, ToolRequest};
use crate::traits::ToolContext;

/// Receives every completed tool-call record. Implemented by the session's
/// audit log.
pub trait AuditSink: Send + Sync {
    /// Append one completed record. Records are immutable once appended.
    fn record(&self, record: ToolCallRecord);
}

/// Scoped tool-dispatch handle for one turn of one session.
#[derive(Clone)]
pub struct ToolDispatcher {
    invoker: Arc<ToolInvoker>,
    state: SharedState,
    session_id: SessionId,
    agent: Option<String>,
    sink: Arc<dyn AuditSink>,
    cancellation: CancellationToken,
}

impl ToolDispatcher {
    /// Bind a dispatcher for one turn.
    #[must_use]
    pub fn new(
        invoker: Arc<ToolInvoker>,
        state: SharedState,
        session_id: SessionId,
        agent: Option<String>,
        sink: Arc<dyn AuditSink>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            invoker,
            state,
            session_id,
            agent,
            sink,
            cancellation,
        }
    }

    /// Invoke one tool and return its outcome. The audit record is
    /// appended whatever the result.
    pub async fn call(&self, name: impl Into<String>, arguments: Value) -> ToolOutcome {
        let ctx = ToolContext::new(
            ToolCallId::new(),
            self.session_id.clone(),
            self.agent.clone(),
            self.state.clone(),
            self.cancellation.clone(),
        );
        let record = self
            .invoker
            .invoke(ToolRequest::new(name, arguments), &ctx)
            .await;
        let outcome = record.outcome.clone();
        self.sink.record(record);
        outcome
    }

    /// Invoke several tools concurrently, preserving request order in the
    /// returned outcomes.
    pub async fn call_many(&self, requests: Vec<(String, Value)>) -> Vec<ToolOutcome> {
        let futures: Vec<_> = requests
            .into_iter()
            .map(|(name, args)| self.call(name, args))
            .collect();
        futures::future::join_all(futures).await
    }

    /// The names of every registered tool.
    #[must_use]
    pub fn available_tools(&self) -> Vec<String> {
        self.invoker.registry().names()
    }

    /// `(name, description, schema)` for every registered tool, for
    /// decision adapters that present their options to a reasoning
    /// backend.
    #[must_use]
    pub fn tool_catalog(&self) -> Vec<(String, String, Value)> {
        self.invoker.registry().catalog()
    }
}
