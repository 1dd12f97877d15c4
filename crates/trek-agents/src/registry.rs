//! Agent registry — the catalog the orchestrator routes over.
//!
//! Populated once at startup; read-only thereafter from the
//! orchestrator's perspective. Registration order is preserved and is the
//! stable tie-break order when several agents are eligible at once.

use std::collections::HashMap;

use tracing::debug;
use trek_state::StateSnapshot;

use crate::descriptor::AgentDescriptor;
use crate::errors::RegistryError;

/// Ordered catalog of registered agents with global name uniqueness.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: Vec<AgentDescriptor>,
    index: HashMap<String, usize>,
}

impl AgentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent. Fails with [`RegistryError::DuplicateAgent`] if
    /// the name is taken; nothing is registered in that case.
    pub fn register(&mut self, descriptor: AgentDescriptor) -> Result<(), RegistryError> {
        let name = descriptor.name().to_owned();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateAgent { name });
        }
        debug!(agent = name, "agent registered");
        let _ = self.index.insert(name, self.agents.len());
        self.agents.push(descriptor);
        Ok(())
    }

    /// Look up an agent by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AgentDescriptor> {
        self.index.get(name).map(|&i| &self.agents[i])
    }

    /// Look up an agent by name, failing with
    /// [`RegistryError::AgentNotFound`] if absent.
    pub fn require(&self, name: &str) -> Result<&AgentDescriptor, RegistryError> {
        self.get(name).ok_or_else(|| RegistryError::AgentNotFound {
            name: name.to_owned(),
        })
    }

    /// Every agent whose eligibility predicate accepts `snapshot`, in
    /// registration order.
    #[must_use]
    pub fn eligible(&self, snapshot: &StateSnapshot) -> Vec<&AgentDescriptor> {
        self.agents
            .iter()
            .filter(|d| d.is_eligible(snapshot))
            .collect()
    }

    /// All registered names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(AgentDescriptor::name).collect()
    }

    /// Number of registered agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Whether an agent with the given name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}
