//! Scripted decision agent — walks a fixed queue of canned steps.
//!
//! Stands in for a real reasoning backend in tests and demos: each step
//! issues zero or more tool calls through the dispatcher, then replies.
//! Once the script runs dry the agent finishes and hands control back.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::decision::{Decision, DecisionAgent, TurnInput};
use crate::errors::AgentError;

/// One canned turn of a [`ScriptedAgent`].
#[derive(Clone, Debug)]
pub struct ScriptedStep {
    /// Tool calls to issue, in order, before replying.
    pub tool_calls: Vec<(String, Value)>,
    /// The reply text for the turn.
    pub reply: String,
    /// Whether this step relinquishes the conversation.
    pub relinquish: bool,
}

impl ScriptedStep {
    /// A step that only replies and keeps ownership.
    #[must_use]
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            tool_calls: Vec::new(),
            reply: text.into(),
            relinquish: false,
        }
    }

    /// A step that replies and relinquishes.
    #[must_use]
    pub fn finish(text: impl Into<String>) -> Self {
        Self {
            tool_calls: Vec::new(),
            reply: text.into(),
            relinquish: true,
        }
    }

    /// Add a tool call to issue before the reply.
    #[must_use]
    pub fn with_tool_call(mut self, name: impl Into<String>, arguments: Value) -> Self {
        self.tool_calls.push((name.into(), arguments));
        self
    }
}

/// Decision agent that replays a queue of [`ScriptedStep`]s.
pub struct ScriptedAgent {
    steps: Mutex<VecDeque<ScriptedStep>>,
}

impl ScriptedAgent {
    /// Create an agent from a script.
    #[must_use]
    pub fn new(steps: impl IntoIterator<Item = ScriptedStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
        }
    }

    /// Remaining steps in the script.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.lock().len()
    }
}

#[async_trait]
impl DecisionAgent for ScriptedAgent {
    async fn decide(&self, input: TurnInput<'_>) -> Result<Decision, AgentError> {
        let Some(step) = self.steps.lock().pop_front() else {
            return Ok(Decision::finish("I've done all I can here."));
        };

        for (name, arguments) in step.tool_calls {
            // Failures come back as data; the script replies regardless.
            let _ = input.tools.call(name, arguments).await;
        }

        Ok(Decision {
            reply: step.reply,
            relinquish: step.relinquish,
        })
    }
}
