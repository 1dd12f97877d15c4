//! Core trait and DI abstractions for the tool system.
//!
//! Defines [`Tool`] — the trait every tool implements — the per-invocation
//! [`ToolContext`], and the [`HttpClient`] dependency-injection trait the
//! travel tools use for outbound requests.

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use trek_core::{SessionId, ToolCallId};
use trek_state::{SharedState, StateError, StateSnapshot};

use crate::errors::ToolError;

// ─────────────────────────────────────────────────────────────────────────────
// Tool context
// ─────────────────────────────────────────────────────────────────────────────

/// Execution context passed to every tool invocation.
///
/// Created fresh per call, binding the invocation to one session. The
/// shared state is reachable only through the scoped accessors here —
/// tools never hold the session or any process-wide state.
#[derive(Clone, Debug)]
pub struct ToolContext {
    tool_call_id: ToolCallId,
    session_id: SessionId,
    agent: Option<String>,
    state: SharedState,
    cancellation: CancellationToken,
}

impl ToolContext {
    /// Bind a fresh context for one invocation.
    #[must_use]
    pub fn new(
        tool_call_id: ToolCallId,
        session_id: SessionId,
        agent: Option<String>,
        state: SharedState,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            tool_call_id,
            session_id,
            agent,
            state,
            cancellation,
        }
    }

    /// Unique ID of this tool call.
    #[must_use]
    pub fn tool_call_id(&self) -> &ToolCallId {
        &self.tool_call_id
    }

    /// Session this invocation belongs to.
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Name of the agent that issued the call, if any.
    #[must_use]
    pub fn agent(&self) -> Option<&str> {
        self.agent.as_deref()
    }

    /// Cancellation token for cooperative cancellation.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Read a value from the session's shared state.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.get(key)
    }

    /// Write a value into the session's shared state, returning the new
    /// version. Atomic: either the whole write lands or nothing does.
    pub fn set(&self, key: &str, value: Value) -> Result<u64, StateError> {
        self.state.set(key, value)
    }

    /// Atomically read-modify-write a value in the session's shared state.
    pub fn update(
        &self,
        key: &str,
        f: impl FnOnce(Option<&Value>) -> Value,
    ) -> Result<u64, StateError> {
        self.state.update(key, f)
    }

    /// Take an immutable snapshot of the session's shared state.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────────────────────────────────────

/// The trait every tool must implement.
///
/// Each tool provides a name, a one-line description, a JSON parameter
/// schema (validated by the invoker before execution), and the execution
/// body itself.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name — the exact string agents use to invoke it.
    fn name(&self) -> &str;

    /// One-line capability description.
    fn description(&self) -> &str;

    /// JSON schema object for the tool's arguments.
    ///
    /// The invoker checks `required` properties and declared primitive
    /// `type`s before calling [`execute`](Tool::execute).
    fn parameters_schema(&self) -> Value;

    /// Optional per-tool timeout in milliseconds. `None` uses the
    /// invoker's default.
    fn timeout_ms(&self) -> Option<u64> {
        None
    }

    /// Execute the tool with JSON arguments.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value, ToolError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP response from a fetch operation.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value, ToolError> {
        serde_json::from_str(&self.body)
            .map_err(|e| ToolError::http(format!("invalid JSON response: {e}")))
    }
}

/// HTTP client for outbound tool requests (travel searches).
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request with query parameters and headers.
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ToolError>;
}
