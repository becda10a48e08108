//! # tool-server
//!
//! The tool-invocation dispatch boundary over the cognitive reasoning
//! engine (`spec.md` §6). Everything here is transport-agnostic: callers
//! hand in a `{ tool_name, params }` invocation and get back either a JSON
//! result or a typed [`error::ToolError`]. Framing the invocations over a
//! wire (stdin/stdout, a socket, a queue) is the binary's job, not this
//! library's.
//!
//! ## Module Organization
//!
//! - [`dispatch`] — the `AppState`/`ToolInvocation` types and the dispatch
//!   table itself.
//! - [`tools`] — one module per recognised tool name.
//! - [`params`] / [`problem_builder`] — shared parameter-extraction helpers.
//! - [`error`] — the wire-ready error shape and its conversions.

pub mod dispatch;
pub mod error;
pub mod params;
pub mod problem_builder;
pub mod tools;
