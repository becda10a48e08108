//! `analyze` — the structured sibling of `think`: pattern matches and
//! insights as typed objects rather than narrated text (`spec.md` §4.4,
//! §4.5, §6: "structured objects per §4").

use serde_json::{json, Map, Value};

use reasoning_core::insight;
use reasoning_core::pattern::{extract_key_terms, match_patterns};

use crate::dispatch::AppState;
use crate::error::ToolError;
use crate::params::{optional_str, require_str};

pub async fn run(state: &AppState, params: &Map<String, Value>) -> Result<Value, ToolError> {
    let description = require_str(params, "description")?;
    let domain = optional_str(params, "domain").unwrap_or("general");

    let key_terms = extract_key_terms(description);
    let pattern_matches = match_patterns(&state.patterns, description, domain, &key_terms);
    let insights = insight::generate(&pattern_matches, &key_terms, &state.config);

    Ok(json!({
        "key_terms": key_terms,
        "pattern_matches": pattern_matches,
        "insights": insights,
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
    async fn returns_structured_patterns_and_insights() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("description".into(), json!("the API latency has increased significantly"));

        let result = run(&state, &params).await.unwrap();
        assert!(result["insights"]["used_fallback"].as_bool().unwrap());
    }
}
