//! Shared `Problem`/`Evidence` construction from a tool's parameter map,
//! used by every tool that dispatches against reasoning-core's `Problem`
//! type (`assess_confidence`, `breakdown`, `analyze`, `think_parallel`).

use serde_json::{Map, Value};

use reasoning_core::problem::{Evidence, Problem};

use crate::error::ToolError;
use crate::params::{optional_f64, optional_str, optional_string_vec, require_str};

pub fn build_problem(params: &Map<String, Value>) -> Result<Problem, ToolError> {
    let description = require_str(params, "description")?;
    let domain = optional_str(params, "domain").unwrap_or("general");
    let mut problem = Problem::new(description, domain)?;

    if let Some(complexity) = optional_f64(params, "complexity") {
        problem = problem.with_complexity(complexity)?;
    }
    if let Some(uncertainty) = optional_f64(params, "uncertainty") {
        problem = problem.with_uncertainty(uncertainty)?;
    }
    if let Some(time_sensitivity) = optional_f64(params, "time_sensitivity") {
        problem = problem.with_time_sensitivity(time_sensitivity)?;
    }

    Ok(problem
        .with_constraints(optional_string_vec(params, "constraints"))
        .with_stakeholders(optional_string_vec(params, "stakeholders"))
        .with_goals(optional_string_vec(params, "goals")))
}

pub fn parse_evidence(params: &Map<String, Value>) -> Result<Vec<Evidence>, ToolError> {
    let Some(items) = params.get("evidence").and_then(Value::as_array) else { return Ok(Vec::new()) };
    items
        .iter()
        .map(|item| {
            let obj = item.as_object().ok_or_else(|| ToolError::bad_params("each 'evidence' entry must be an object"))?;
            let content = obj.get("content").and_then(Value::as_str).ok_or_else(|| ToolError::bad_params("evidence entry missing 'content'"))?;
            let source = obj.get("source").and_then(Value::as_str).unwrap_or("unspecified");
            let mut evidence = Evidence::new(content, source)?;
            if let Some(reliability) = obj.get("reliability").and_then(Value::as_f64) {
                evidence = evidence.with_reliability(reliability)?;
            }
            if let Some(relevance) = obj.get("relevance").and_then(Value::as_f64) {
                evidence = evidence.with_relevance(relevance)?;
            }
            Ok(evidence)
        })
        .collect()
}
