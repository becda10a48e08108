//! `think_parallel` — dispatches the four reasoning streams through the
//! coordinator (`spec.md` §4.7, §6: `{ stream_results, synthesis,
//! diversity, overhead_percentage, status }`).

use serde_json::{Map, Value};

use reasoning_core::coordinator::{self, CancelFlag};
use reasoning_core::problem::Context;
use reasoning_core::streams::default_streams;

use crate::dispatch::AppState;
use crate::error::ToolError;
use crate::params::optional_str;
use crate::problem_builder::build_problem;

pub async fn run(state: &AppState, params: &Map<String, Value>) -> Result<Value, ToolError> {
    let problem = build_problem(params)?;
    let context = optional_str(params, "problem_type").map(|problem_type| Context {
        domain: Some(problem.domain.clone()),
        problem_type: Some(problem_type.to_string()),
        extras: Default::default(),
    });

    let response = coordinator::run(default_streams(), &problem, context.as_ref(), &state.config, CancelFlag::new()).await;

    serde_json::to_value(&response).map_err(|e| ToolError::new("serialization_error", e.to_string()))
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
    async fn runs_all_four_streams_to_a_composed_result() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("description".into(), json!("evaluate whether to migrate the billing pipeline"));

        let result = run(&state, &params).await.unwrap();
        assert_eq!(result["stream_results"].as_array().unwrap().len(), 4);
    }
}
