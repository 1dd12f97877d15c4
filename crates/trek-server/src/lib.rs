//! # trek-server
//!
//! The HTTP boundary of the Trek orchestrator: an Axum router exposing
//! the session API (`start_session` / `post_message` / `end_session`)
//! plus a health endpoint. The server holds no conversation state of its
//! own — everything lives in the runtime's session manager.

#![deny(unsafe_code)]

pub mod api;
pub mod health;

pub use api::{AppState, build_router};
