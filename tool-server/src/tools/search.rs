//! `search` — tag-based memory search, by exact set (`AND`/`OR`) or by
//! hierarchical prefix (`spec.md` §4.8, §6: `{ memories, total,
//! next_offset? }`).

use serde_json::{json, Map, Value};

use memory_store::TagSearchOp;

use crate::dispatch::AppState;
use crate::error::ToolError;
use crate::params::{optional_str, optional_string_vec, require_str};

pub async fn run(state: &AppState, params: &Map<String, Value>) -> Result<Value, ToolError> {
    let user_id = require_str(params, "user_id")?;

    let memories = if let Some(prefix) = optional_str(params, "prefix") {
        memory_store::ops::search::search_by_tag_prefix(&state.memory, user_id, prefix).await?
    } else {
        let tags = optional_string_vec(params, "tags");
        let op = match optional_str(params, "op").unwrap_or("or") {
            "and" | "AND" => TagSearchOp::And,
            _ => TagSearchOp::Or,
        };
        memory_store::ops::search::search_by_tags(&state.memory, user_id, &tags, op).await?
    };

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
    async fn searches_by_tag_or() {
        let state = state().await;
        let id = memory_store::ops::memories::create_memory(&state.memory, Memory::new("alice", "note", Sector::Episodic)).await.unwrap();
        memory_store::ops::tags::add_tags(&state.memory, "alice", id, &["work".to_string()]).await.unwrap();

        let mut params = Map::new();
        params.insert("user_id".into(), json!("alice"));
        params.insert("tags".into(), json!(["work"]));

        let result = run(&state, &params).await.unwrap();
        assert_eq!(result["total"], 1);
    }

    #[tokio::test]
    async fn empty_tags_return_empty_results() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("user_id".into(), json!("alice"));

        let result = run(&state, &params).await.unwrap();
        assert_eq!(result["total"], 0);
    }
}
