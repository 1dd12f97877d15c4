//! Agent and registry error types.

use thiserror::Error;

/// Errors from an agent's decision function.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The decision function failed.
    #[error("decision failed: {message}")]
    Decision {
        /// Description of the failure.
        message: String,
    },
}

impl AgentError {
    /// Build a decision error.
    #[must_use]
    pub fn decision(message: impl Into<String>) -> Self {
        Self::Decision {
            message: message.into(),
        }
    }
}

/// Errors from agent registration and lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// An agent with this name is already registered.
    #[error("duplicate agent: {name}")]
    DuplicateAgent {
        /// The conflicting name.
        name: String,
    },

    /// No agent with this name is registered.
    #[error("agent not found: {name}")]
    AgentNotFound {
        /// The unknown name.
        name: String,
    },
}

/// Errors from the external selection function.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The selector returned a name outside the candidate set.
    #[error("invalid selection: {message}")]
    Invalid {
        /// Description of the failure.
        message: String,
    },

    /// The selector itself failed.
    #[error("selection failed: {message}")]
    Failed {
        /// Description of the failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(
            RegistryError::DuplicateAgent { name: "flights".into() }.to_string(),
            "duplicate agent: flights"
        );
        assert_eq!(
            RegistryError::AgentNotFound { name: "x".into() }.to_string(),
            "agent not found: x"
        );
        assert_eq!(
            AgentError::decision("backend unreachable").to_string(),
            "decision failed: backend unreachable"
        );
    }
}
