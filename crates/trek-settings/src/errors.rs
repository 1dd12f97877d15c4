//! Settings error types.

use thiserror::Error;

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors from loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading the settings file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file or merged value is not valid JSON.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = SettingsError::from(std::io::Error::other("disk gone"));
        assert!(err.to_string().contains("disk gone"));
    }
}
