//! `forget` — cascade-deletes an owned memory (`spec.md` §4.8 "Cascade
//! delete").

use serde_json::{json, Map, Value};

use crate::dispatch::AppState;
use crate::error::ToolError;
use crate::params::{require_str, require_uuid};

pub async fn run(state: &AppState, params: &Map<String, Value>) -> Result<Value, ToolError> {
    let user_id = require_str(params, "user_id")?;
    let memory_id = require_uuid(params, "memory_id")?;

    memory_store::ops::memories::delete_memory(&state.memory, user_id, memory_id).await?;

    Ok(json!({ "deleted": true, "memory_id": memory_id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory_store::{Memory, Sector};
    use std::sync::Arc;

    async fn state() -> AppState {
        let dir = tempfile::tempdir().unwrap();
        AppState {
            memory: memory_store::MemoryStore::open(&dir.path().join("memory.redb")).await.unwrap(),
            patterns: Arc::new(reasoning_core::pattern::PatternRegistry::empty()),
            config: Arc::new(reasoning_core::config::EngineConfig::default()),
        }
    }

    #[tokio::test]
    async fn forgets_an_owned_memory() {
        let state = state().await;
        let id = memory_store::ops::memories::create_memory(&state.memory, Memory::new("alice", "note", Sector::Episodic)).await.unwrap();

        let mut params = Map::new();
        params.insert("user_id".into(), json!("alice"));
        params.insert("memory_id".into(), json!(id.to_string()));

        let result = run(&state, &params).await.unwrap();
        assert_eq!(result["deleted"], true);

        assert!(memory_store::ops::memories::get_memory(&state.memory, "alice", id).await.is_err());
    }

    #[tokio::test]
    async fn forgetting_a_missing_memory_is_not_found() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("user_id".into(), json!("alice"));
        params.insert("memory_id".into(), json!(uuid::Uuid::new_v4().to_string()));

        let err = run(&state, &params).await.unwrap_err();
        assert_eq!(err.code, "not_found");
    }
}
