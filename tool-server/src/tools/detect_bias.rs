//! `detect_bias` — scans a reasoning transcript for the four cognitive
//! bias signatures (`spec.md` §4.2, §6: `{ biases: [BiasDetection] }`).

use serde_json::{json, Map, Value};

use reasoning_core::bias;
use reasoning_core::step::{ReasoningStep, ReasoningStepType};

use crate::dispatch::AppState;
use crate::error::ToolError;

fn parse_step_type(raw: Option<&str>) -> ReasoningStepType {
    match raw {
        Some("deductive") => ReasoningStepType::Deductive,
        Some("inductive") => ReasoningStepType::Inductive,
        Some("analogical") => ReasoningStepType::Analogical,
        Some("heuristic") => ReasoningStepType::Heuristic,
        Some("contextual") => ReasoningStepType::Contextual,
        Some("metacognitive") => ReasoningStepType::Metacognitive,
        _ => ReasoningStepType::LogicalInference,
    }
}

fn parse_steps(params: &Map<String, Value>) -> Result<Vec<ReasoningStep>, ToolError> {
    let items = params.get("steps").and_then(Value::as_array).ok_or_else(|| ToolError::bad_params("missing 'steps' array"))?;
    items
        .iter()
        .map(|item| {
            let obj = item.as_object().ok_or_else(|| ToolError::bad_params("each 'steps' entry must be an object"))?;
            let content = obj.get("content").and_then(Value::as_str).ok_or_else(|| ToolError::bad_params("step entry missing 'content'"))?;
            let confidence = obj.get("confidence").and_then(Value::as_f64).unwrap_or(0.5);
            let kind = parse_step_type(obj.get("type").and_then(Value::as_str));
            Ok(ReasoningStep::new(kind, content, confidence))
        })
        .collect()
}

pub async fn run(_state: &AppState, params: &Map<String, Value>) -> Result<Value, ToolError> {
    let steps = parse_steps(params)?;
    let biases = bias::detect(&steps);
    Ok(json!({ "biases": biases }))
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
    async fn detects_confirmation_bias_on_uniformly_confident_steps() {
        let state = state().await;
        let mut params = Map::new();
        params.insert(
            "steps".into(),
            json!([
                { "content": "it's definitely the cache", "confidence": 0.95 },
                { "content": "must be the cache layer", "confidence": 0.95 },
                { "content": "certainly cache-related", "confidence": 0.95 },
            ]),
        );

        let result = run(&state, &params).await.unwrap();
        assert!(!result["biases"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn requires_a_steps_array() {
        let state = state().await;
        assert!(run(&state, &Map::new()).await.is_err());
    }
}
