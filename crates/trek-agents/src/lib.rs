//! # trek-agents
//!
//! Agent capability descriptors and the registry the orchestrator routes
//! over.
//!
//! Agents themselves are external collaborators: their reasoning lives
//! behind the [`DecisionAgent`](decision::DecisionAgent) trait, and the
//! judgment call of picking between several eligible agents lives behind
//! the [`Selector`](selector::Selector) trait. The orchestrator core only
//! ever sees those seams — framework-specific reasoning backends are
//! adapters behind them.
//!
//! An [`AgentDescriptor`](descriptor::AgentDescriptor) pairs a unique name
//! and one-line capability summary with a pure eligibility predicate over
//! a state snapshot. The [`AgentRegistry`](registry::AgentRegistry) is
//! populated once at startup and read-only afterwards; registration order
//! is the stable tie-break order for routing.

#![deny(unsafe_code)]

pub mod decision;
pub mod descriptor;
pub mod errors;
pub mod registry;
pub mod scripted;
pub mod selector;

pub use decision::{Decision, DecisionAgent, TurnInput};
pub use descriptor::AgentDescriptor;
pub use errors::{AgentError, RegistryError, SelectionError};
pub use registry::AgentRegistry;
pub use scripted::{ScriptedAgent, ScriptedStep};
pub use selector::{Candidate, FixedSelector, Selector};
