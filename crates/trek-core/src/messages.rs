//! Message types for the Trek conversation model.
//!
//! Messages form the conversation history of a session. Three roles: user,
//! agent, and system. History is append-only; ordering is the sole source
//! of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The end user.
    User,
    /// A registered agent (the producing agent is named on the message).
    Agent,
    /// The orchestrator itself (fallback replies, routing notices).
    System,
}

/// One ordered entry in a session's conversation history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Who produced this message.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Name of the agent that produced the message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Creation time (UTC).
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            agent: None,
            timestamp: Utc::now(),
        }
    }

    /// Create an agent message attributed to `agent`.
    #[must_use]
    pub fn agent(agent: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
            agent: Some(agent.into()),
            timestamp: Utc::now(),
        }
    }

    /// Create a system message (orchestrator fallback replies).
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            agent: None,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_has_no_agent() {
        let msg = Message::user("hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "hello");
        assert!(msg.agent.is_none());
    }

    #[test]
    fn agent_message_carries_name() {
        let msg = Message::agent("flights", "found 3 options");
        assert_eq!(msg.role, Role::Agent);
        assert_eq!(msg.agent.as_deref(), Some("flights"));
    }

    #[test]
    fn system_message() {
        let msg = Message::system("which city are you travelling to?");
        assert_eq!(msg.role, Role::System);
        assert!(msg.agent.is_none());
    }

    #[test]
    fn role_serde_values() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Agent).unwrap(), "\"agent\"");
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
    }

    #[test]
    fn message_serde_roundtrip() {
        let msg = Message::agent("hotels", "booked");
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn agent_field_omitted_when_absent() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert!(json.get("agent").is_none());
    }
}
