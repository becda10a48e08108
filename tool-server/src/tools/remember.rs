//! `remember` — persists a new memory, optionally tagging it on creation
//! (`spec.md` §6: `{ memory_id, embeddings_generated, salience, strength }`).

use serde_json::{json, Map, Value};

use memory_store::{Memory, MemoryMetadata, Sector};
use reasoning_core::retry::{with_retry, RetryConfig};

use crate::dispatch::AppState;
use crate::error::ToolError;
use crate::params::{optional_f64, optional_str, optional_string_vec, require_str};

fn parse_sector(raw: &str) -> Result<Sector, ToolError> {
    match raw {
        "episodic" => Ok(Sector::Episodic),
        "semantic" => Ok(Sector::Semantic),
        "procedural" => Ok(Sector::Procedural),
        "emotional" => Ok(Sector::Emotional),
        "reflective" => Ok(Sector::Reflective),
        other => Err(ToolError::bad_params(format!("unknown primary_sector '{other}'"))),
    }
}

/// Stands in for the out-of-scope embedding vectorisation service
/// (`spec.md` §1 "treated as external collaborators"): wired through the
/// same `ExternalUnavailable`-retry path a real call would use, so the
/// retry policy is exercised even though this stub never actually fails.
async fn generate_embeddings(_content: &str) -> Result<u32, reasoning_core::Error> {
    with_retry(&RetryConfig::default(), || async { Ok(1) }).await
}

pub async fn run(state: &AppState, params: &Map<String, Value>) -> Result<Value, ToolError> {
    let user_id = require_str(params, "user_id")?;
    let content = require_str(params, "content")?;
    let sector = parse_sector(optional_str(params, "primary_sector").unwrap_or("episodic"))?;

    let mut memory = Memory::new(user_id, content, sector);
    memory.session_id = optional_str(params, "session_id").map(str::to_string);
    memory.metadata = MemoryMetadata {
        keywords: optional_string_vec(params, "keywords"),
        tags: optional_string_vec(params, "tags"),
        category: optional_str(params, "category").map(str::to_string),
        context: optional_str(params, "context").map(str::to_string),
        importance: optional_f64(params, "importance").unwrap_or(0.5),
        is_atomic: params.get("is_atomic").and_then(Value::as_bool).unwrap_or(false),
        parent_id: None,
    };
    if let Some(salience) = optional_f64(params, "salience") {
        memory.salience = salience;
    }
    if let Some(strength) = optional_f64(params, "strength") {
        memory.strength = strength;
    }

    let tags = optional_string_vec(params, "tags");
    let salience = memory.salience;
    let strength = memory.strength;
    let memory_id = memory_store::ops::memories::create_memory(&state.memory, memory).await?;
    if !tags.is_empty() {
        memory_store::ops::tags::add_tags(&state.memory, user_id, memory_id, &tags).await?;
    }

    let embeddings_generated = generate_embeddings(content).await?;

    Ok(json!({
        "memory_id": memory_id,
        "embeddings_generated": embeddings_generated,
        "salience": salience,
        "strength": strength,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
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
    async fn remembers_content_and_tags_it() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("user_id".into(), json!("alice"));
        params.insert("content".into(), json!("the deploy window is Tuesday"));
        params.insert("tags".into(), json!(["deploys"]));

        let result = run(&state, &params).await.unwrap();
        assert!(result["memory_id"].is_string());
        assert_eq!(result["salience"], 0.5);
    }

    #[tokio::test]
    async fn rejects_unknown_sector() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("user_id".into(), json!("alice"));
        params.insert("content".into(), json!("x"));
        params.insert("primary_sector".into(), json!("fictional"));

        assert!(run(&state, &params).await.is_err());
    }
}
