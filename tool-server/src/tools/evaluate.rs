//! `evaluate` — the comprehensive sibling of `analyze`/`breakdown`: folds
//! pattern-matched insights, a confidence assessment and (when reasoning
//! steps are supplied) bias detection into a single structured object
//! (`spec.md` §6: "structured objects per §4").

use serde_json::{json, Map, Value};

use reasoning_core::bias;
use reasoning_core::confidence::{self, ReasoningContext};
use reasoning_core::insight;
use reasoning_core::pattern::{extract_key_terms, match_patterns};
use reasoning_core::step::{ReasoningStep, ReasoningStepType};

use crate::dispatch::AppState;
use crate::error::ToolError;
use crate::params::{optional_str, optional_string_vec, require_str};
use crate::problem_builder::{build_problem, parse_evidence};

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

/// `steps` is optional here (unlike `detect_bias`, where it is required):
/// an evaluation with no recorded reasoning steps simply reports no biases.
fn parse_steps(params: &Map<String, Value>) -> Result<Vec<ReasoningStep>, ToolError> {
    let Some(items) = params.get("steps").and_then(Value::as_array) else { return Ok(Vec::new()) };
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

pub async fn run(state: &AppState, params: &Map<String, Value>) -> Result<Value, ToolError> {
    let description = require_str(params, "description")?;
    let domain = optional_str(params, "domain").unwrap_or("general");

    let key_terms = extract_key_terms(description);
    let pattern_matches = match_patterns(&state.patterns, description, domain, &key_terms);
    let insights = insight::generate(&pattern_matches, &key_terms, &state.config);

    let problem = build_problem(params)?;
    let evidence = parse_evidence(params)?;
    let goals = optional_string_vec(params, "goals");
    let constraints = optional_string_vec(params, "constraints");
    let framework = optional_str(params, "framework");
    let ctx = ReasoningContext { problem: &problem, context: None, evidence: &evidence, goals: &goals, constraints: &constraints, framework };
    let assessment = confidence::assess(&ctx, &state.config.confidence_weights, None);

    let steps = parse_steps(params)?;
    let biases = bias::detect(&steps);

    Ok(json!({
        "key_terms": key_terms,
        "pattern_matches": pattern_matches,
        "insights": insights,
        "confidence": assessment,
        "biases": biases,
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
    async fn combines_insights_confidence_and_biases() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("description".into(), json!("the checkout service is timing out under peak load"));
        params.insert(
            "steps".into(),
            json!([
                { "content": "it's definitely the cache", "confidence": 0.95 },
                { "content": "must be the cache layer", "confidence": 0.95 },
                { "content": "certainly cache-related", "confidence": 0.95 },
            ]),
        );

        let result = run(&state, &params).await.unwrap();
        assert!(result["insights"]["used_fallback"].as_bool().unwrap());
        assert!(result["confidence"]["overall"].as_f64().unwrap() >= 0.0);
        assert!(!result["biases"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn steps_are_optional() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("description".into(), json!("evaluate the rollout plan"));

        let result = run(&state, &params).await.unwrap();
        assert!(result["biases"].as_array().unwrap().is_empty());
    }
}
