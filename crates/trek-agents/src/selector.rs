//! The external agent-selection seam.
//!
//! When several agents are eligible for the same turn, the orchestrator
//! defers the judgment call to a [`Selector`] — the one point where the
//! routing state machine delegates outward. The contract: return the name
//! of one of the presented candidates. Anything else (an unknown name, an
//! error, a timeout enforced by the caller) is treated as "no selection"
//! and the orchestrator falls back to the first-registered eligible agent.

use async_trait::async_trait;
use trek_core::Message;
use trek_state::StateSnapshot;

use crate::errors::SelectionError;

/// What a selector gets to see about each eligible agent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Agent name (the value the selector must return).
    pub name: String,
    /// One-line capability summary.
    pub summary: String,
}

/// External orchestration-selection function.
#[async_trait]
pub trait Selector: Send + Sync {
    /// Pick one of `candidates` given the state snapshot and history.
    async fn select(
        &self,
        candidates: &[Candidate],
        snapshot: &StateSnapshot,
        history: &[Message],
    ) -> Result<String, SelectionError>;
}

/// Selector that always returns a fixed name. Useful in tests and demos.
pub struct FixedSelector {
    name: String,
}

impl FixedSelector {
    /// Always select `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Selector for FixedSelector {
    async fn select(
        &self,
        _candidates: &[Candidate],
        _snapshot: &StateSnapshot,
        _history: &[Message],
    ) -> Result<String, SelectionError> {
        Ok(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use trek_state::SharedState;

    use super::*;

    #[tokio::test]
    async fn fixed_selector_ignores_candidates() {
        let selector = FixedSelector::new("hotels");
        let picked = selector
            .select(
                &[Candidate {
                    name: "flights".into(),
                    summary: "Flight search".into(),
                }],
                &SharedState::new().snapshot(),
                &[],
            )
            .await
            .unwrap();
        assert_eq!(picked, "hotels");
    }
}
