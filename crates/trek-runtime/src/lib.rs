//! # trek-runtime
//!
//! The orchestration core of Trek: who owns the conversation, and how a
//! user turn flows through it.
//!
//! - [`Orchestrator`](orchestrator::Orchestrator) — the routing state
//!   machine. Whenever no agent owns the conversation it inspects a
//!   shared-state snapshot and the agent registry and picks the next
//!   owner, deferring to an external selector only when several agents
//!   are eligible at once.
//! - [`Session`](session::Session) — one user's conversation: shared
//!   state, message history, tool-call audit log, and the turn guard that
//!   keeps turns strictly sequential.
//! - [`SessionManager`](session_manager::SessionManager) — the map of
//!   live sessions and the `start_session` / `post_message` /
//!   `end_session` API the frontend boundary calls.
//!
//! The orchestrator, registry, and tool invoker hold no session data and
//! are shared freely across sessions; everything mutable lives inside one
//! session's [`SharedState`](trek_state::SharedState).

#![deny(unsafe_code)]

pub mod errors;
pub mod orchestrator;
pub mod session;
pub mod session_manager;
pub mod turn;

pub use errors::RuntimeError;
pub use orchestrator::{Orchestrator, RoutingState, Selection};
pub use session::Session;
pub use session_manager::{RuntimeConfig, SessionManager};
pub use turn::TurnReply;
