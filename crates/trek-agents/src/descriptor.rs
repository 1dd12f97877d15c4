//! Agent capability descriptors.

use std::fmt;
use std::sync::Arc;

use trek_state::StateSnapshot;

use crate::decision::DecisionAgent;

/// Pure predicate: can this agent usefully act given the current state?
pub type EligibilityFn = Arc<dyn Fn(&StateSnapshot) -> bool + Send + Sync>;

/// Describes one registered agent: unique name, one-line capability
/// summary, eligibility predicate, and the handle to its external
/// decision function.
///
/// Descriptors are registered once at startup and immutable thereafter.
#[derive(Clone)]
pub struct AgentDescriptor {
    name: String,
    summary: String,
    eligibility: EligibilityFn,
    decision: Arc<dyn DecisionAgent>,
}

impl AgentDescriptor {
    /// Create a descriptor with an explicit eligibility predicate.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        summary: impl Into<String>,
        eligibility: impl Fn(&StateSnapshot) -> bool + Send + Sync + 'static,
        decision: Arc<dyn DecisionAgent>,
    ) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            eligibility: Arc::new(eligibility),
            decision,
        }
    }

    /// Create a descriptor that is eligible for every state.
    #[must_use]
    pub fn always(
        name: impl Into<String>,
        summary: impl Into<String>,
        decision: Arc<dyn DecisionAgent>,
    ) -> Self {
        Self::new(name, summary, |_| true, decision)
    }

    /// Unique agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line capability summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Evaluate the eligibility predicate against a snapshot.
    #[must_use]
    pub fn is_eligible(&self, snapshot: &StateSnapshot) -> bool {
        (self.eligibility)(snapshot)
    }

    /// Handle to the agent's external decision function.
    #[must_use]
    pub fn decision(&self) -> &Arc<dyn DecisionAgent> {
        &self.decision
    }
}

impl fmt::Debug for AgentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentDescriptor")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;
    use trek_state::SharedState;

    use super::*;
    use crate::decision::{Decision, TurnInput};
    use crate::errors::AgentError;

    struct NopAgent;

    #[async_trait]
    impl DecisionAgent for NopAgent {
        async fn decide(&self, _input: TurnInput<'_>) -> Result<Decision, AgentError> {
            Ok(Decision::finish("done"))
        }
    }

    #[test]
    fn always_descriptor_is_always_eligible() {
        let desc = AgentDescriptor::always("legal", "Visa and entry rules", Arc::new(NopAgent));
        assert_eq!(desc.name(), "legal");
        assert_eq!(desc.summary(), "Visa and entry rules");
        assert!(desc.is_eligible(&SharedState::new().snapshot()));
    }

    #[test]
    fn predicate_routes_on_state() {
        let desc = AgentDescriptor::new(
            "hotels",
            "Hotel search",
            |snap| snap.contains("trip.destination"),
            Arc::new(NopAgent),
        );

        let state = SharedState::new();
        assert!(!desc.is_eligible(&state.snapshot()));

        let _ = state.set("trip.destination", json!("Singapore")).unwrap();
        assert!(desc.is_eligible(&state.snapshot()));
    }

    #[test]
    fn debug_omits_closures() {
        let desc = AgentDescriptor::always("flights", "Flight search", Arc::new(NopAgent));
        let debug = format!("{desc:?}");
        assert!(debug.contains("flights"));
        assert!(debug.contains("Flight search"));
        assert!(!debug.contains("eligibility"));
    }
}
