//! # trek-core
//!
//! Foundation types for the Trek multi-agent orchestrator.
//!
//! This crate provides the shared vocabulary that all other Trek crates
//! depend on:
//!
//! - **Branded IDs**: `SessionId`, `UserId`, `ToolCallId` as newtypes for
//!   type safety
//! - **Messages**: the conversation history entry (`Message`, `Role`)
//! - **Audit records**: `ToolCallRecord` with request, outcome, and duration

#![deny(unsafe_code)]

pub mod audit;
pub mod ids;
pub mod messages;

pub use audit::{ToolCallRecord, ToolFailure, ToolOutcome};
pub use ids::{SessionId, ToolCallId, UserId};
pub use messages::{Message, Role};
