//! `think` — single-shot narrative reasoning: pattern-match the problem
//! text, generate insights, and narrate the result (`spec.md` §6: `{
//! reasoning, conclusion, mode_used, thoughts, used_fallback? }`).
//!
//! Distinct from `think_parallel`, which dispatches the four reasoning
//! streams; `think` is the direct C4/C5 path with no stream coordination.

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
    let matches = match_patterns(&state.patterns, description, domain, &key_terms);
    let response = insight::generate(&matches, &key_terms, &state.config);

    let reasoning: Vec<String> = response.hypotheses.iter().map(|h| h.hypothesis.statement.clone()).collect();
    let thoughts: Vec<Value> = response.recommendations.iter().map(|r| json!({ "content": r.recommendation.action })).collect();
    let conclusion = response
        .recommendations
        .first()
        .map(|r| r.recommendation.action.clone())
        .or_else(|| response.hypotheses.first().map(|h| h.hypothesis.statement.clone()))
        .unwrap_or_else(|| "no conclusion reached".to_string());
    let mode_used = if response.used_fallback { "fallback" } else { "pattern_match" };

    Ok(json!({
        "reasoning": reasoning,
        "conclusion": conclusion,
        "mode_used": mode_used,
        "thoughts": thoughts,
        "used_fallback": response.used_fallback,
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
    async fn falls_back_when_no_patterns_are_registered() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("description".into(), json!("the service is slow under load"));

        let result = run(&state, &params).await.unwrap();
        assert_eq!(result["mode_used"], "fallback");
        assert_eq!(result["used_fallback"], true);
    }

    #[tokio::test]
    async fn requires_a_description() {
        let state = state().await;
        assert!(run(&state, &Map::new()).await.is_err());
    }
}
