//! # trek-tools
//!
//! The tool system for the Trek orchestrator.
//!
//! - [`Tool`](traits::Tool) — the trait every tool implements, with a JSON
//!   parameter schema declared for pre-invocation validation
//! - [`ToolContext`](traits::ToolContext) — a scoped handle created fresh
//!   per invocation, giving the tool read/write access to the owning
//!   session's shared state and nothing else
//! - [`ToolRegistry`](registry::ToolRegistry) — name → tool index
//! - [`ToolInvoker`](invoker::ToolInvoker) — bounded-timeout execution that
//!   always yields an audit record, success or failure
//! - [`ToolDispatcher`](dispatcher::ToolDispatcher) — the per-turn handle
//!   agents use to issue (possibly concurrent) tool calls
//! - Travel search tools ([`travel`]) behind an [`HttpClient`](traits::HttpClient)
//!   dependency-injection trait

#![deny(unsafe_code)]

pub mod dispatcher;
pub mod errors;
pub mod invoker;
pub mod providers;
pub mod registry;
pub mod traits;
pub mod travel;

pub use dispatcher::{AuditSink, ToolDispatcher};
pub use errors::ToolError;
pub use invoker::{ToolInvoker, ToolRequest};
pub use registry::ToolRegistry;
pub use traits::{HttpClient, HttpResponse, Tool, ToolContext};
