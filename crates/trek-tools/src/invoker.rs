//! Tool invoker — lookup → validate → execute-under-timeout pipeline.
//!
//! Every invocation, whatever its outcome, produces exactly one completed
//! [`ToolCallRecord`]. Failures are data handed back to the calling
//! agent's decision logic — they never propagate as panics or uncontrolled
//! errors, so the agent keeps the ability to retry or pick another tool.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use trek_core::{ToolCallRecord, ToolFailure, ToolOutcome};

use crate::errors::ToolError;
use crate::registry::ToolRegistry;
use crate::traits::ToolContext;

/// Default per-invocation timeout when neither the tool nor the caller
/// sets one.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// A request to invoke a named tool.
#[derive(Clone, Debug)]
pub struct ToolRequest {
    /// Tool name to invoke.
    pub name: String,
    /// Arguments (JSON object).
    pub arguments: Value,
}

impl ToolRequest {
    /// Build a request.
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Executes registered tools against a [`ToolContext`] under a bounded
/// timeout.
///
/// Stateless with respect to session data; one invoker is shared across
/// all sessions.
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
    default_timeout_ms: u64,
}

impl ToolInvoker {
    /// Create an invoker over `registry` with the default timeout.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self::with_timeout(registry, DEFAULT_TIMEOUT_MS)
    }

    /// Create an invoker with a specific default timeout in milliseconds.
    #[must_use]
    pub fn with_timeout(registry: Arc<ToolRegistry>, default_timeout_ms: u64) -> Self {
        Self {
            registry,
            default_timeout_ms,
        }
    }

    /// The registry this invoker dispatches against.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Invoke `request` against `ctx`, returning the completed audit record.
    ///
    /// Pipeline: lookup (`ToolNotFound`) → argument validation
    /// (`ArgumentError`) → execution under timeout (`Timeout` /
    /// `Runtime`).
    #[instrument(skip_all, fields(tool_name = request.name, session_id = %ctx.session_id()))]
    pub async fn invoke(&self, request: ToolRequest, ctx: &ToolContext) -> ToolCallRecord {
        let start = Instant::now();
        let requested_at = Utc::now();

        let outcome = self.run(&request, ctx).await;
        if let ToolOutcome::Failure(failure) = &outcome {
            warn!(tool_name = request.name, ?failure, "tool invocation failed");
        }

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(tool_name = request.name, duration_ms, "tool invocation finished");

        ToolCallRecord {
            id: ctx.tool_call_id().clone(),
            session_id: ctx.session_id().clone(),
            tool_name: request.name,
            arguments: request.arguments,
            agent: ctx.agent().map(ToOwned::to_owned),
            requested_at,
            outcome,
            duration_ms,
        }
    }

    async fn run(&self, request: &ToolRequest, ctx: &ToolContext) -> ToolOutcome {
        let Some(tool) = self.registry.get(&request.name) else {
            return ToolOutcome::Failure(ToolFailure::ToolNotFound {
                name: request.name.clone(),
            });
        };

        if let Err(message) = validate_arguments(&tool.parameters_schema(), &request.arguments) {
            return ToolOutcome::Failure(ToolFailure::ArgumentError { message });
        }

        if ctx.cancellation().is_cancelled() {
            return ToolOutcome::Failure(ToolFailure::Runtime {
                message: "operation cancelled".into(),
            });
        }

        let timeout_ms = tool.timeout_ms().unwrap_or(self.default_timeout_ms);
        let deadline = Duration::from_millis(timeout_ms);

        match tokio::time::timeout(deadline, tool.execute(request.arguments.clone(), ctx)).await {
            Ok(Ok(value)) => ToolOutcome::Success(value),
            Ok(Err(ToolError::Validation { message })) => {
                ToolOutcome::Failure(ToolFailure::ArgumentError { message })
            }
            Ok(Err(err)) => ToolOutcome::Failure(ToolFailure::Runtime {
                message: err.to_string(),
            }),
            Err(_) => ToolOutcome::Failure(ToolFailure::Timeout { timeout_ms }),
        }
    }
}

/// Check `args` against the declared schema: must be a JSON object, every
/// `required` property present, and declared primitive types respected.
fn validate_arguments(schema: &Value, args: &Value) -> Result<(), String> {
    let Some(args_obj) = args.as_object() else {
        return Err("arguments must be a JSON object".into());
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !args_obj.contains_key(name) {
                return Err(format!("missing required argument: {name}"));
            }
        }
    }

    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        for (name, decl) in props {
            let Some(value) = args_obj.get(name) else {
                continue;
            };
            let Some(expected) = decl.get("type").and_then(Value::as_str) else {
                continue;
            };
            let matches = match expected {
                "string" => value.is_string(),
                "integer" => value.is_i64() || value.is_u64(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                "array" => value.is_array(),
                "object" => value.is_object(),
                _ => true,
            };
            if !matches {
                return Err(format!("argument {name} must be of type {expected}"));
            }
        }
    }

    Ok(())
}
