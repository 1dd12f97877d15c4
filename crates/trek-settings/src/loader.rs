//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TrekSettings::default()`]
//! 2. If `~/.trek/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::TrekSettings;

/// Resolve the path to the settings file (`~/.trek/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".trek").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<TrekSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<TrekSettings> {
    let defaults = serde_json::to_value(TrekSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: TrekSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `TREK_*` environment variable overrides to loaded settings.
///
/// Strict parsing rules: integers must be valid and within range; invalid
/// values are silently ignored (fall back to file/default).
pub fn apply_env_overrides(settings: &mut TrekSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary lookup (tests inject a map here).
pub fn apply_overrides(
    settings: &mut TrekSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = read_string(&lookup, "TREK_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_u64(&lookup, "TREK_PORT", 0, 65_535) {
        #[allow(clippy::cast_possible_truncation)]
        {
            settings.server.port = v as u16;
        }
    }
    if let Some(v) = read_u64(&lookup, "TREK_MAX_SESSIONS", 1, 100_000) {
        #[allow(clippy::cast_possible_truncation)]
        {
            settings.server.max_sessions = v as usize;
        }
    }
    if let Some(v) = read_u64(&lookup, "TREK_DECISION_TIMEOUT_MS", 100, 3_600_000) {
        settings.runtime.decision_timeout_ms = v;
    }
    if let Some(v) = read_u64(&lookup, "TREK_SELECTION_TIMEOUT_MS", 10, 600_000) {
        settings.runtime.selection_timeout_ms = v;
    }
    if let Some(v) = read_u64(&lookup, "TREK_TOOL_TIMEOUT_MS", 100, 3_600_000) {
        settings.runtime.tool_timeout_ms = v;
    }
    if let Some(v) = read_string(&lookup, "TREK_RAPIDAPI_KEY") {
        settings.booking.rapidapi_key = v;
    }
    if let Some(v) = read_string(&lookup, "TREK_BOOKING_URL") {
        settings.booking.base_url = v;
    }
}

fn read_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.is_empty())
}

fn read_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    min: u64,
    max: u64,
) -> Option<u64> {
    lookup(name)?
        .parse::<u64>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}
