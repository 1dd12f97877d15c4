//! Settings types with compiled defaults.

use serde::{Deserialize, Serialize};

/// All Trek settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrekSettings {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Turn and routing timeouts.
    pub runtime: RuntimeSettings,
    /// Booking API settings for the travel tools.
    pub booking: BookingSettings,
}

/// HTTP server settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Host to bind.
    pub host: String,
    /// Port to bind (`0` auto-assigns).
    pub port: u16,
    /// Maximum concurrent live sessions.
    pub max_sessions: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            max_sessions: 200,
        }
    }
}

/// Turn and routing timeouts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeSettings {
    /// Timeout for one agent decision call, in milliseconds.
    pub decision_timeout_ms: u64,
    /// Timeout for the external agent-selection call, in milliseconds.
    pub selection_timeout_ms: u64,
    /// Default timeout for one tool invocation, in milliseconds.
    pub tool_timeout_ms: u64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            decision_timeout_ms: 30_000,
            selection_timeout_ms: 5_000,
            tool_timeout_ms: 30_000,
        }
    }
}

/// Booking API settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingSettings {
    /// RapidAPI key (usually from `TREK_RAPIDAPI_KEY`).
    pub rapidapi_key: String,
    /// Base URL of the booking API.
    pub base_url: String,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            rapidapi_key: String::new(),
            base_url: "https://booking-com15.p.rapidapi.com".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = TrekSettings::default();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.max_sessions, 200);
        assert_eq!(settings.runtime.decision_timeout_ms, 30_000);
        assert_eq!(settings.runtime.selection_timeout_ms, 5_000);
        assert_eq!(settings.runtime.tool_timeout_ms, 30_000);
        assert!(settings.booking.rapidapi_key.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let settings = TrekSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: TrekSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: TrekSettings =
            serde_json::from_str(r#"{"server": {"port": 9000}}"#).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.runtime.decision_timeout_ms, 30_000);
    }

    #[test]
    fn camel_case_wire_names() {
        let json = serde_json::to_value(TrekSettings::default()).unwrap();
        assert!(json["server"].get("maxSessions").is_some());
        assert!(json["runtime"].get("decisionTimeoutMs").is_some());
        assert!(json["booking"].get("rapidapiKey").is_some());
    }
}
