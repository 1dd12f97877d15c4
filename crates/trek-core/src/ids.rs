//! Branded ID newtypes for type safety.
//!
//! Every entity in the Trek system has a distinct ID type implemented as a
//! newtype wrapper around `String`. This prevents accidentally passing a
//! user ID where a session ID is expected.
//!
//! All IDs are UUID v7 (time-ordered) generated via [`uuid::Uuid::now_v7`].

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generate a new UUID v7 string (time-ordered).
fn new_v7() -> String {
    Uuid::now_v7().to_string()
}

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID (UUID v7, time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(new_v7())
            }

            /// Create from an existing string value.
            #[must_use]
            pub fn from_string(s: String) -> Self {
                Self(s)
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

branded_id! {
    /// Identifies one end-to-end conversation session.
    SessionId
}

branded_id! {
    /// Stable identity key for a user across sessions.
    UserId
}

branded_id! {
    /// Identifies a single tool invocation within a session.
    ToolCallId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn ids_are_valid_uuids() {
        let id = ToolCallId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn from_string_preserves_value() {
        let id = UserId::from_string("user-42".into());
        assert_eq!(id.as_str(), "user-42");
        assert_eq!(id.into_inner(), "user-42");
    }

    #[test]
    fn display_matches_inner() {
        let id = SessionId::from("abc");
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn serde_is_transparent() {
        let id = SessionId::from_string("s-1".into());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"s-1\"");
        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deref_to_str() {
        let id = UserId::from_string("u-1".into());
        assert!(id.starts_with("u-"));
    }
}
