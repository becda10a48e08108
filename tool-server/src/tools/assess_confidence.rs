//! `assess_confidence` — runs the multi-dimensional confidence assessor
//! over a problem and its supporting evidence (`spec.md` §4.3, §6).

use serde_json::{Map, Value};

use reasoning_core::confidence::{self, ReasoningContext};

use crate::dispatch::AppState;
use crate::error::ToolError;
use crate::params::{optional_str, optional_string_vec};
use crate::problem_builder::{build_problem, parse_evidence};

pub async fn run(state: &AppState, params: &Map<String, Value>) -> Result<Value, ToolError> {
    let problem = build_problem(params)?;
    let evidence = parse_evidence(params)?;
    let goals = optional_string_vec(params, "goals");
    let constraints = optional_string_vec(params, "constraints");
    let framework = optional_str(params, "framework");

    let ctx = ReasoningContext { problem: &problem, context: None, evidence: &evidence, goals: &goals, constraints: &constraints, framework };

    let assessment = confidence::assess(&ctx, &state.config.confidence_weights, None);
    serde_json::to_value(&assessment).map_err(|e| ToolError::new("serialization_error", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
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
    async fn assesses_confidence_with_evidence() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("description".into(), json!("migrate the billing pipeline"));
        params.insert("evidence".into(), json!([{ "content": "load test passed", "source": "ci", "reliability": 0.9 }]));

        let result = run(&state, &params).await.unwrap();
        assert!(result["overall"].as_f64().unwrap() >= 0.0);
    }
}
