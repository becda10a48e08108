//! `recall` — direct by-id retrieval (`spec.md` §6: `{ memories, total,
//! next_offset? }`). Contrasted with `search`, which queries by tag.

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::dispatch::AppState;
use crate::error::ToolError;
use crate::params::require_str;

pub async fn run(state: &AppState, params: &Map<String, Value>) -> Result<Value, ToolError> {
    let user_id = require_str(params, "user_id")?;

    let ids: Vec<Uuid> = if let Some(id) = params.get("memory_id").and_then(Value::as_str) {
        vec![Uuid::parse_str(id).map_err(|e| ToolError::bad_params(format!("'memory_id' is not a valid id: {e}")))?]
    } else if let Some(values) = params.get("memory_ids").and_then(Value::as_array) {
        values
            .iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| ToolError::bad_params("'memory_ids' entries must be strings"))
                    .and_then(|s| Uuid::parse_str(s).map_err(|e| ToolError::bad_params(format!("invalid id in 'memory_ids': {e}"))))
            })
            .collect::<Result<_, _>>()?
    } else {
        return Err(ToolError::bad_params("recall requires either 'memory_id' or 'memory_ids'"));
    };

    let mut memories = Vec::with_capacity(ids.len());
    for id in ids {
        memories.push(memory_store::ops::memories::get_memory(&state.memory, user_id, id).await?);
    }

    let total = memories.len();
    Ok(json!({ "memories": memories, "total": total, "next_offset": Value::Null }))
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
    async fn recalls_a_single_memory_by_id() {
        let state = state().await;
        let id = memory_store::ops::memories::create_memory(&state.memory, Memory::new("alice", "note", Sector::Episodic)).await.unwrap();

        let mut params = Map::new();
        params.insert("user_id".into(), json!("alice"));
        params.insert("memory_id".into(), json!(id.to_string()));

        let result = run(&state, &params).await.unwrap();
        assert_eq!(result["total"], 1);
    }

    #[tokio::test]
    async fn requires_an_id_parameter() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("user_id".into(), json!("alice"));
        assert!(run(&state, &params).await.is_err());
    }
}
