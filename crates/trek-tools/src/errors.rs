//! Tool error types.

use thiserror::Error;

/// Errors a tool can return from execution.
///
/// The invoker converts these (plus lookup and timeout failures) into the
/// typed [`trek_core::ToolFailure`] descriptors recorded in the audit log.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Argument validation failed inside the tool.
    #[error("validation error: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// An outbound HTTP request failed.
    #[error("http error: {message}")]
    Http {
        /// Description of the HTTP failure.
        message: String,
    },

    /// Operation was cancelled.
    #[error("cancelled")]
    Cancelled,

    /// Internal / unexpected error.
    #[error("{message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl From<trek_state::StateError> for ToolError {
    fn from(err: trek_state::StateError) -> Self {
        Self::Validation {
            message: err.to_string(),
        }
    }
}

impl ToolError {
    /// Build a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Build an HTTP error.
    #[must_use]
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// Build an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_errors_surface_as_validation() {
        let state_err = trek_state::StateError::invalid_key("empty key");
        let err = ToolError::from(state_err);
        assert!(matches!(err, ToolError::Validation { .. }));
    }

    #[test]
    fn display_formats() {
        assert_eq!(
            ToolError::validation("missing field").to_string(),
            "validation error: missing field"
        );
        assert_eq!(
            ToolError::http("502 from upstream").to_string(),
            "http error: 502 from upstream"
        );
        assert_eq!(ToolError::Cancelled.to_string(), "cancelled");
        assert_eq!(ToolError::internal("boom").to_string(), "boom");
    }
}
