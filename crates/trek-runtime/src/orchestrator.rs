//! The routing state machine.
//!
//! Conversation ownership moves through three states: no agent owns it
//! ([`RoutingState::Idle`]), one named agent owns it
//! ([`RoutingState::Active`]), or the session is over
//! ([`RoutingState::Terminated`], terminal). The active-agent name itself
//! lives in the session's shared state, so claiming and relinquishing
//! ownership are single atomic state mutations.
//!
//! [`Orchestrator::select`] runs whenever a turn starts with no owner:
//! snapshot → eligible set → pick. With zero eligible agents the
//! orchestrator answers directly (the fallback path never blocks); with
//! exactly one it is chosen without consulting the selector; with several
//! the external selector gets the call, bounded by a timeout, and any
//! failure — timeout, error, or a name outside the candidate set — falls
//! back to the first-registered eligible agent so routing never stalls.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};
use trek_agents::{AgentRegistry, Candidate, Selector};
use trek_core::Message;
use trek_state::{SharedState, StateSnapshot};

/// Where conversation ownership currently sits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoutingState {
    /// No agent owns the conversation; the next turn routes.
    Idle,
    /// The named agent owns the conversation.
    Active(String),
    /// The session is over; no further transitions.
    Terminated,
}

impl RoutingState {
    /// Derive the current state from a session's shared state and
    /// terminated flag.
    #[must_use]
    pub fn current(state: &SharedState, terminated: bool) -> Self {
        if terminated {
            return Self::Terminated;
        }
        match state.active_agent() {
            Some(name) => Self::Active(name),
            None => Self::Idle,
        }
    }
}

/// Outcome of a routing decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Route the turn to this agent.
    Agent(String),
    /// No agent is eligible; the orchestrator answers directly.
    NoneEligible,
}

/// Stateless routing coordinator, shared across all sessions.
pub struct Orchestrator {
    registry: Arc<AgentRegistry>,
    selector: Option<Arc<dyn Selector>>,
    selection_timeout: Duration,
}

impl Orchestrator {
    /// Create an orchestrator over a registry with no external selector;
    /// multi-eligible ties resolve to the first-registered agent.
    #[must_use]
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self {
            registry,
            selector: None,
            selection_timeout: Duration::from_millis(5_000),
        }
    }

    /// Attach an external selector consulted when several agents are
    /// eligible at once.
    #[must_use]
    pub fn with_selector(mut self, selector: Arc<dyn Selector>, timeout: Duration) -> Self {
        self.selector = Some(selector);
        self.selection_timeout = timeout;
        self
    }

    /// The registry this orchestrator routes over.
    #[must_use]
    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// Pick the next conversation owner for the given snapshot.
    ///
    /// Deterministic for a fixed snapshot and registry (modulo the
    /// external selector), so a retry after a transient failure cannot
    /// fork behavior.
    #[instrument(skip_all, fields(version = snapshot.version()))]
    pub async fn select(&self, snapshot: &StateSnapshot, history: &[Message]) -> Selection {
        let eligible = self.registry.eligible(snapshot);

        let Some(first) = eligible.first() else {
            debug!("no eligible agents, answering directly");
            return Selection::NoneEligible;
        };
        let first = first.name().to_owned();

        if eligible.len() == 1 {
            debug!(agent = first, "single eligible agent");
            return Selection::Agent(first);
        }

        let Some(selector) = &self.selector else {
            debug!(agent = first, "no selector configured, using first-registered");
            return Selection::Agent(first);
        };

        let candidates: Vec<Candidate> = eligible
            .iter()
            .map(|d| Candidate {
                name: d.name().to_owned(),
                summary: d.summary().to_owned(),
            })
            .collect();

        let picked = tokio::time::timeout(
            self.selection_timeout,
            selector.select(&candidates, snapshot, history),
        )
        .await;

        match picked {
            Ok(Ok(name)) if candidates.iter().any(|c| c.name == name) => {
                debug!(agent = name, "selector picked");
                Selection::Agent(name)
            }
            Ok(Ok(name)) => {
                warn!(
                    agent = name,
                    fallback = first,
                    "selector returned a name outside the candidate set"
                );
                Selection::Agent(first)
            }
            Ok(Err(err)) => {
                warn!(error = %err, fallback = first, "selector failed");
                Selection::Agent(first)
            }
            Err(_) => {
                warn!(fallback = first, "selector timed out");
                Selection::Agent(first)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;
    use trek_agents::{
        AgentDescriptor, AgentError, Decision, DecisionAgent, FixedSelector, SelectionError,
        TurnInput,
    };

    use super::*;

    struct NopAgent;

    #[async_trait]
    impl DecisionAgent for NopAgent {
        async fn decide(&self, _input: TurnInput<'_>) -> Result<Decision, AgentError> {
            Ok(Decision::finish("done"))
        }
    }

    fn always(name: &str) -> AgentDescriptor {
        AgentDescriptor::always(name, format!("{name} specialist"), Arc::new(NopAgent))
    }

    /// Selector that counts invocations before delegating to a fixed pick.
    struct CountingSelector {
        calls: AtomicUsize,
        pick: String,
    }

    impl CountingSelector {
        fn new(pick: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                pick: pick.into(),
            }
        }
    }

    #[async_trait]
    impl Selector for CountingSelector {
        async fn select(
            &self,
            _candidates: &[Candidate],
            _snapshot: &StateSnapshot,
            _history: &[Message],
        ) -> Result<String, SelectionError> {
            let _ = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pick.clone())
        }
    }

    /// Selector that never answers within any reasonable timeout.
    struct StalledSelector;

    #[async_trait]
    impl Selector for StalledSelector {
        async fn select(
            &self,
            _candidates: &[Candidate],
            _snapshot: &StateSnapshot,
            _history: &[Message],
        ) -> Result<String, SelectionError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(SelectionError::Failed {
                message: "unreachable".into(),
            })
        }
    }

    #[test]
    fn routing_state_from_shared_state() {
        let state = SharedState::new();
        assert_eq!(RoutingState::current(&state, false), RoutingState::Idle);

        let _ = state.set_active_agent("flights");
        assert_eq!(
            RoutingState::current(&state, false),
            RoutingState::Active("flights".into())
        );

        assert_eq!(RoutingState::current(&state, true), RoutingState::Terminated);
    }

    #[tokio::test]
    async fn empty_registry_answers_directly() {
        let orch = Orchestrator::new(Arc::new(AgentRegistry::new()));
        let snapshot = SharedState::new().snapshot();
        assert_eq!(orch.select(&snapshot, &[]).await, Selection::NoneEligible);
    }

    #[tokio::test]
    async fn single_eligible_skips_the_selector() {
        let mut registry = AgentRegistry::new();
        registry.register(always("sightseeing")).unwrap();
        let selector = Arc::new(CountingSelector::new("sightseeing"));
        let orch = Orchestrator::new(Arc::new(registry))
            .with_selector(selector.clone(), Duration::from_secs(1));

        let snapshot = SharedState::new().snapshot();
        let picked = orch.select(&snapshot, &[]).await;
        assert_eq!(picked, Selection::Agent("sightseeing".into()));
        assert_eq!(selector.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn multi_eligible_defers_to_selector() {
        let mut registry = AgentRegistry::new();
        registry.register(always("flights")).unwrap();
        registry.register(always("hotels")).unwrap();
        let orch = Orchestrator::new(Arc::new(registry))
            .with_selector(Arc::new(FixedSelector::new("hotels")), Duration::from_secs(1));

        let snapshot = SharedState::new().snapshot();
        assert_eq!(
            orch.select(&snapshot, &[]).await,
            Selection::Agent("hotels".into())
        );
    }

    #[tokio::test]
    async fn selector_timeout_falls_back_to_first_registered() {
        let mut registry = AgentRegistry::new();
        registry.register(always("flights")).unwrap();
        registry.register(always("hotels")).unwrap();
        let orch = Orchestrator::new(Arc::new(registry))
            .with_selector(Arc::new(StalledSelector), Duration::from_millis(20));

        let snapshot = SharedState::new().snapshot();
        assert_eq!(
            orch.select(&snapshot, &[]).await,
            Selection::Agent("flights".into())
        );
    }

    #[tokio::test]
    async fn invalid_selection_falls_back_to_first_registered() {
        let mut registry = AgentRegistry::new();
        registry.register(always("flights")).unwrap();
        registry.register(always("hotels")).unwrap();
        let orch = Orchestrator::new(Arc::new(registry)).with_selector(
            Arc::new(FixedSelector::new("imaging")),
            Duration::from_secs(1),
        );

        let snapshot = SharedState::new().snapshot();
        assert_eq!(
            orch.select(&snapshot, &[]).await,
            Selection::Agent("flights".into())
        );
    }

    #[tokio::test]
    async fn no_selector_uses_first_registered() {
        let mut registry = AgentRegistry::new();
        registry.register(always("flights")).unwrap();
        registry.register(always("hotels")).unwrap();
        let orch = Orchestrator::new(Arc::new(registry));

        let snapshot = SharedState::new().snapshot();
        assert_eq!(
            orch.select(&snapshot, &[]).await,
            Selection::Agent("flights".into())
        );
    }

    #[tokio::test]
    async fn select_is_deterministic_per_snapshot() {
        let mut registry = AgentRegistry::new();
        registry.register(always("flights")).unwrap();
        registry.register(AgentDescriptor::new(
            "hotels",
            "Hotel search",
            |snap| snap.contains("trip.destination"),
            Arc::new(NopAgent),
        )).unwrap();
        let orch = Orchestrator::new(Arc::new(registry))
            .with_selector(Arc::new(FixedSelector::new("hotels")), Duration::from_secs(1));

        let state = SharedState::new();
        let _ = state.set("trip.destination", json!("Singapore")).unwrap();
        let snapshot = state.snapshot();

        let first = orch.select(&snapshot, &[]).await;
        for _ in 0..5 {
            assert_eq!(orch.select(&snapshot, &[]).await, first);
        }
    }
}
