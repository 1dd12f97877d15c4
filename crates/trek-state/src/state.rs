//! The shared state container and its immutable snapshots.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use crate::errors::StateError;

/// Key prefix reserved for the runtime itself.
const RESERVED_PREFIX: &str = "_";

#[derive(Debug, Default)]
struct StateInner {
    entries: BTreeMap<String, Value>,
    version: u64,
    active_agent: Option<String>,
}

/// Versioned key/value state for one session.
///
/// Cheap to clone — clones share the same underlying state. The write lock
/// is the single serializing mutation path: every mutation (including
/// active-agent changes) bumps the version counter exactly once, and no
/// mutation is ever partially applied.
#[derive(Clone, Debug, Default)]
pub struct SharedState {
    inner: Arc<RwLock<StateInner>>,
}

impl SharedState {
    /// Create an empty state at version 0 with no active agent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_key(key: &str) -> Result<(), StateError> {
        if key.is_empty() {
            return Err(StateError::invalid_key("empty key"));
        }
        if key.starts_with(RESERVED_PREFIX) {
            return Err(StateError::invalid_key(format!(
                "key {key:?} uses the reserved {RESERVED_PREFIX:?} prefix"
            )));
        }
        Ok(())
    }

    /// Read the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.read().entries.get(key).cloned()
    }

    /// Write `value` under `key`, returning the new version.
    ///
    /// Fails with [`StateError::InvalidKey`] on a malformed key; nothing
    /// is written in that case.
    pub fn set(&self, key: &str, value: Value) -> Result<u64, StateError> {
        self.update(key, |_| value)
    }

    /// Atomically read-modify-write the value under `key`.
    ///
    /// The closure receives the current value (if any) and returns the new
    /// one; the whole exchange happens under the write lock, so concurrent
    /// updates never lose effects.
    pub fn update(
        &self,
        key: &str,
        f: impl FnOnce(Option<&Value>) -> Value,
    ) -> Result<u64, StateError> {
        Self::validate_key(key)?;
        let mut inner = self.inner.write();
        let next = f(inner.entries.get(key));
        let _ = inner.entries.insert(key.to_owned(), next);
        inner.version += 1;
        Ok(inner.version)
    }

    /// Current version counter.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.read().version
    }

    /// Name of the agent currently owning the conversation, if any.
    #[must_use]
    pub fn active_agent(&self) -> Option<String> {
        self.inner.read().active_agent.clone()
    }

    /// Mark `name` as the active agent. One atomic mutation.
    pub fn set_active_agent(&self, name: impl Into<String>) -> u64 {
        let mut inner = self.inner.write();
        inner.active_agent = Some(name.into());
        inner.version += 1;
        inner.version
    }

    /// Clear the active agent. One atomic mutation.
    pub fn clear_active_agent(&self) -> u64 {
        let mut inner = self.inner.write();
        inner.active_agent = None;
        inner.version += 1;
        inner.version
    }

    /// Take an immutable copy of the state at this instant.
    ///
    /// The snapshot holds no locks; its version lets callers detect stale
    /// reads against the live state (optimistic-concurrency style).
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        let inner = self.inner.read();
        StateSnapshot {
            entries: inner.entries.clone(),
            version: inner.version,
            active_agent: inner.active_agent.clone(),
        }
    }
}

/// An immutable copy of a [`SharedState`] at a point in time.
///
/// Used for decision-making (eligibility predicates, agent selection)
/// without blocking concurrent writers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    entries: BTreeMap<String, Value>,
    version: u64,
    active_agent: Option<String>,
}

impl StateSnapshot {
    /// Read the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The version the snapshot was taken at.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The active agent at snapshot time, if any.
    #[must_use]
    pub fn active_agent(&self) -> Option<&str> {
        self.active_agent.as_deref()
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn get_before_set_is_none() {
        let state = SharedState::new();
        assert!(state.get("trip.destination").is_none());
    }

    #[test]
    fn read_your_writes() {
        let state = SharedState::new();
        let v = state.set("trip.destination", json!("Singapore")).unwrap();
        assert_eq!(v, 1);
        assert_eq!(state.get("trip.destination"), Some(json!("Singapore")));
    }

    #[test]
    fn set_overwrites_last_writer_wins() {
        let state = SharedState::new();
        let _ = state.set("k", json!(1)).unwrap();
        let _ = state.set("k", json!(2)).unwrap();
        assert_eq!(state.get("k"), Some(json!(2)));
    }

    #[test]
    fn empty_key_rejected_without_mutation() {
        let state = SharedState::new();
        let err = state.set("", json!(1)).unwrap_err();
        assert_matches!(err, StateError::InvalidKey { .. });
        assert_eq!(state.version(), 0);
    }

    #[test]
    fn reserved_prefix_rejected() {
        let state = SharedState::new();
        let err = state.set("_internal", json!(1)).unwrap_err();
        assert_matches!(err, StateError::InvalidKey { .. });
        assert!(state.get("_internal").is_none());
    }

    #[test]
    fn active_agent_mutations_bump_version() {
        let state = SharedState::new();
        let v1 = state.set_active_agent("flights");
        assert_eq!(v1, 1);
        assert_eq!(state.active_agent().as_deref(), Some("flights"));
        let v2 = state.clear_active_agent();
        assert_eq!(v2, 2);
        assert!(state.active_agent().is_none());
    }

    #[test]
    fn snapshot_is_stable_against_later_writes() {
        let state = SharedState::new();
        let _ = state.set("k", json!("before")).unwrap();
        let snap = state.snapshot();
        let _ = state.set("k", json!("after")).unwrap();
        assert_eq!(snap.get("k"), Some(&json!("before")));
        assert_eq!(snap.version(), 1);
        assert_eq!(state.version(), 2);
    }

    #[test]
    fn snapshot_carries_active_agent() {
        let state = SharedState::new();
        let _ = state.set_active_agent("hotels");
        let snap = state.snapshot();
        assert_eq!(snap.active_agent(), Some("hotels"));
    }

    #[test]
    fn clones_share_state() {
        let state = SharedState::new();
        let handle = state.clone();
        let _ = handle.set("k", json!(7)).unwrap();
        assert_eq!(state.get("k"), Some(json!(7)));
        assert_eq!(state.version(), 1);
    }

    #[test]
    fn concurrent_updates_lose_nothing() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 100;

        let state = SharedState::new();
        let _ = state.set("counter", json!(0)).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                let state = state.clone();
                let _ = scope.spawn(move || {
                    for _ in 0..PER_THREAD {
                        let _ = state
                            .update("counter", |cur| {
                                let n = cur.and_then(Value::as_i64).unwrap_or(0);
                                json!(n + 1)
                            })
                            .unwrap();
                    }
                });
            }
        });

        let total = state.get("counter").and_then(|v| v.as_i64()).unwrap();
        assert_eq!(total, (THREADS * PER_THREAD) as i64);
        assert_eq!(state.version(), (THREADS * PER_THREAD) as u64 + 1);
    }

    proptest! {
        #[test]
        fn version_strictly_increases(keys in proptest::collection::vec("[a-z]{1,8}", 1..32)) {
            let state = SharedState::new();
            let mut last = state.version();
            for (i, key) in keys.iter().enumerate() {
                let v = state.set(key, json!(i)).unwrap();
                prop_assert!(v > last, "version must strictly increase");
                prop_assert_eq!(state.get(key), Some(json!(i)));
                last = v;
            }
        }
    }
}
