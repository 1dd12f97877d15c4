//! One turn of one session, end to end.
//!
//! A turn: append the user message → make sure some agent owns the
//! conversation (routing if nobody does) → let the owner's decision
//! function run under a timeout, issuing audited tool calls as it goes →
//! append the reply → honor a relinquish. Aborting a turn leaves shared
//! state as of the last committed mutation; committed tool writes from
//! earlier in the same turn are never rolled back.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, instrument, warn};
use trek_agents::TurnInput;
use trek_core::Message;
use trek_tools::{ToolDispatcher, ToolInvoker};

use crate::errors::RuntimeError;
use crate::orchestrator::{Orchestrator, RoutingState, Selection};
use crate::session::Session;

/// What a turn hands back to the frontend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReply {
    /// Reply text shown to the user.
    pub reply: String,
    /// The agent owning the conversation after this turn, if any.
    pub active_agent: Option<String>,
}

/// Clarifying question used when no agent is eligible to take the turn.
const ROUTING_FALLBACK_REPLY: &str =
    "I'm not sure yet which of our specialists can help with that — \
     could you tell me a bit more about your trip?";

/// Retry reply used when the owning agent's decision fails or times out.
const RETRY_REPLY: &str =
    "Sorry, that took longer than expected. Could you send that again?";

/// Run one turn for `session`.
#[instrument(skip_all, fields(session_id = %session.id()))]
pub(crate) async fn run_turn(
    session: &Session,
    orchestrator: &Orchestrator,
    invoker: &Arc<ToolInvoker>,
    decision_timeout: Duration,
    text: String,
) -> Result<TurnReply, RuntimeError> {
    // Turns are strictly sequential per session; a concurrent turn fails
    // fast rather than queueing.
    let Ok(_guard) = session.turn_guard().try_lock() else {
        return Err(RuntimeError::SessionBusy(session.id().to_string()));
    };

    let state = session.state();
    let agent_name = match RoutingState::current(state, session.is_terminated()) {
        RoutingState::Terminated => {
            return Err(RuntimeError::SessionTerminated(session.id().to_string()));
        }
        RoutingState::Active(name) => {
            session.push_message(Message::user(text));
            name
        }
        RoutingState::Idle => {
            session.push_message(Message::user(text));
            let snapshot = state.snapshot();
            let history = session.history();
            match orchestrator.select(&snapshot, &history).await {
                Selection::Agent(name) => {
                    let _ = state.set_active_agent(name.clone());
                    debug!(agent = name, "agent claimed the conversation");
                    name
                }
                Selection::NoneEligible => {
                    session.push_message(Message::system(ROUTING_FALLBACK_REPLY));
                    return Ok(TurnReply {
                        reply: ROUTING_FALLBACK_REPLY.into(),
                        active_agent: None,
                    });
                }
            }
        }
    };

    let descriptor = match orchestrator.registry().require(&agent_name) {
        Ok(descriptor) => descriptor,
        Err(err) => {
            // The owner vanished from the registry; exclude it and fall
            // back to routing on the next turn.
            warn!(error = %err, "active agent missing from registry");
            let _ = state.clear_active_agent();
            session.push_message(Message::system(ROUTING_FALLBACK_REPLY));
            return Ok(TurnReply {
                reply: ROUTING_FALLBACK_REPLY.into(),
                active_agent: None,
            });
        }
    };

    let dispatcher = ToolDispatcher::new(
        invoker.clone(),
        state.clone(),
        session.id().clone(),
        Some(agent_name.clone()),
        session.audit_sink(),
        session.cancellation().child_token(),
    );

    let snapshot = state.snapshot();
    let history = session.history();
    let input = TurnInput {
        history: &history,
        snapshot,
        tools: &dispatcher,
    };

    #[allow(clippy::cast_possible_truncation)]
    let timeout_ms = decision_timeout.as_millis() as u64;
    let decision = match tokio::time::timeout(decision_timeout, descriptor.decision().decide(input))
        .await
    {
        Ok(Ok(decision)) => decision,
        Ok(Err(err)) => {
            warn!(agent = agent_name, error = %err, "decision failed, ending turn with retry reply");
            session.push_message(Message::system(RETRY_REPLY));
            return Ok(TurnReply {
                reply: RETRY_REPLY.into(),
                active_agent: state.active_agent(),
            });
        }
        Err(_) => {
            let err = RuntimeError::DecisionTimeout { timeout_ms };
            warn!(agent = agent_name, error = %err, "ending turn with retry reply");
            session.push_message(Message::system(RETRY_REPLY));
            return Ok(TurnReply {
                reply: RETRY_REPLY.into(),
                active_agent: state.active_agent(),
            });
        }
    };

    session.push_message(Message::agent(agent_name.clone(), decision.reply.clone()));

    if decision.relinquish {
        // One atomic mutation; no observer sees a half-applied handoff.
        let _ = state.clear_active_agent();
        debug!(agent = agent_name, "agent relinquished the conversation");
    }

    Ok(TurnReply {
        reply: decision.reply,
        active_agent: state.active_agent(),
    })
}
