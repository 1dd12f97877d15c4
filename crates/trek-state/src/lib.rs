//! # trek-state
//!
//! Versioned key/value state scoped to one conversation session.
//!
//! [`SharedState`] is the single place a session's accumulated facts live:
//! user profile attributes, trip facts gathered so far, and routing
//! metadata (the active agent). One instance exists per session, owned by
//! that session; agents and tools only ever reach it through a scoped
//! context handle, never directly.
//!
//! All mutations go through a single serializing path (a write lock), so
//! concurrent tool calls within a turn cannot interleave a
//! read-modify-write and lose updates. Readers take [`StateSnapshot`]s —
//! immutable copies with a version counter for stale-read detection — and
//! never block writers.

#![deny(unsafe_code)]

pub mod errors;
pub mod state;

pub use errors::StateError;
pub use state::{SharedState, StateSnapshot};
