//! Tool invocation audit records.
//!
//! Every tool invocation produces exactly one [`ToolCallRecord`] — success
//! or failure — appended to the owning session's audit log. Records are
//! never mutated after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{SessionId, ToolCallId};

/// Typed failure descriptor for a tool invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolFailure {
    /// Execution exceeded its bounded timeout.
    Timeout {
        /// The timeout that was exceeded, in milliseconds.
        timeout_ms: u64,
    },
    /// No tool with the requested name is registered.
    ToolNotFound {
        /// The unknown tool name.
        name: String,
    },
    /// Arguments failed schema validation before invocation.
    ArgumentError {
        /// Description of the validation failure.
        message: String,
    },
    /// The tool itself returned an error during execution.
    Runtime {
        /// Description of the runtime failure.
        message: String,
    },
}

/// Outcome of a tool invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ToolOutcome {
    /// The tool completed and produced a value.
    Success(Value),
    /// The invocation failed with a typed descriptor.
    Failure(ToolFailure),
}

impl ToolOutcome {
    /// Whether this outcome is a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// Immutable record of one tool invocation: request, outcome, duration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRecord {
    /// Unique ID of this invocation.
    pub id: ToolCallId,
    /// Session the invocation belongs to.
    pub session_id: SessionId,
    /// Requested tool name.
    pub tool_name: String,
    /// Arguments as passed (JSON object).
    pub arguments: Value,
    /// Name of the agent that issued the call, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// When the invocation was requested (UTC).
    pub requested_at: DateTime<Utc>,
    /// How the invocation ended.
    pub outcome: ToolOutcome,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ToolCallRecord {
    /// Whether the invocation failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.outcome.is_failure()
    }
}
