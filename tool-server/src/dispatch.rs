//! The `{ tool_name, params }` → typed-result dispatch table
//! (`spec.md` §6 "External Interfaces").

use std::sync::Arc;

use serde_json::{Map, Value};

use memory_store::MemoryStore;
use reasoning_core::config::EngineConfig;
use reasoning_core::pattern::PatternRegistry;

use crate::error::ToolError;
use crate::tools;

/// Shared, cheaply-clonable handles every tool needs. Constructed once at
/// process startup (see `bin/server.rs`).
#[derive(Clone)]
pub struct AppState {
    pub memory: MemoryStore,
    pub patterns: Arc<PatternRegistry>,
    pub config: Arc<EngineConfig>,
}

/// One `{ tool_name, params }` invocation, already parsed from the wire.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub params: Map<String, Value>,
}

/// Routes an invocation to its tool implementation, returning the tool's
/// JSON result on success or a wire-ready `ToolError` on failure. Every
/// recognised tool name from `spec.md` §6 is handled; anything else is an
/// `unknown_tool` error.
pub async fn dispatch(state: &AppState, invocation: ToolInvocation) -> Result<Value, ToolError> {
    let params = &invocation.params;
    match invocation.tool_name.as_str() {
        "remember" => tools::remember::run(state, params).await,
        "recall" => tools::recall::run(state, params).await,
        "search" => tools::search::run(state, params).await,
        "update_memory" => tools::update_memory::run(state, params).await,
        "forget" => tools::forget::run(state, params).await,
        "think" => tools::think::run(state, params).await,
        "think_parallel" => tools::think_parallel::run(state, params).await,
        "assess_confidence" => tools::assess_confidence::run(state, params).await,
        "detect_bias" => tools::detect_bias::run(state, params).await,
        "breakdown" => tools::breakdown::run(state, params).await,
        "analyze" => tools::analyze::run(state, params).await,
        "evaluate" => tools::evaluate::run(state, params).await,
        other => Err(ToolError::unknown_tool(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_tool_name_is_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            memory: MemoryStore::open(&dir.path().join("memory.redb")).await.unwrap(),
            patterns: Arc::new(PatternRegistry::empty()),
            config: Arc::new(EngineConfig::default()),
        };
        let invocation = ToolInvocation { tool_name: "not_a_real_tool".into(), params: Map::new() };
        let err = dispatch(&state, invocation).await.unwrap_err();
        assert_eq!(err.code, "unknown_tool");
    }
}
