//! State error types.

use thiserror::Error;

/// Errors from shared-state operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// The key is malformed (empty, or uses the reserved `_` prefix).
    #[error("invalid state key: {reason}")]
    InvalidKey {
        /// Why the key was rejected.
        reason: String,
    },
}

impl StateError {
    /// Build an invalid-key error.
    #[must_use]
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_reason() {
        let err = StateError::invalid_key("empty key");
        assert_eq!(err.to_string(), "invalid state key: empty key");
    }
}
