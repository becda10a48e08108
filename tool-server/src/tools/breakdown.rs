//! `breakdown` — the C9 Communication Layer's per-dimension factor
//! breakdown over a confidence assessment (`spec.md` §4.9, §6: "structured
//! objects per §4").

use serde_json::{json, Map, Value};

use reasoning_core::communication;
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

    let percentage_and_label = communication::percentage_and_label(assessment.overall)?;
    let interpretation = communication::interpretation(assessment.overall)?;
    let uncertainty_explanation = communication::uncertainty_explanation(assessment.uncertainty_type);

    Ok(json!({
        "factors": assessment.factors,
        "overall": assessment.overall,
        "percentage_and_label": percentage_and_label,
        "interpretation": interpretation,
        "uncertainty_explanation": uncertainty_explanation,
    }))
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
    async fn breaks_down_confidence_into_four_factors() {
        let state = state().await;
        let mut params = Map::new();
        params.insert("description".into(), json!("migrate the billing pipeline"));

        let result = run(&state, &params).await.unwrap();
        assert_eq!(result["factors"].as_array().unwrap().len(), 4);
    }
}
