//! The `Problem` a reasoning run is dispatched over, plus the optional
//! `Context` and raw `Evidence` inputs (`spec.md` §3).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A problem statement submitted for reasoning. Immutable for the
/// duration of a run once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub description: String,
    pub domain: String,
    complexity: f64,
    uncertainty: f64,
    time_sensitivity: f64,
    pub constraints: Vec<String>,
    pub stakeholders: Vec<String>,
    pub evidence: Vec<Evidence>,
    /// Free-form goal statements; not in the original field list but
    /// referenced throughout §4.3's confidence formulae ("goals").
    pub goals: Vec<String>,
    /// Coarse complexity label ("simple" | "moderate" | "complex"),
    /// consumed by the uncertainty-level adjustment in §4.3.
    pub complexity_label: Option<String>,
}

impl Problem {
    /// Builds a problem, clamping scalar scores to `[0,1]` and rejecting an
    /// empty description.
    pub fn new(description: impl Into<String>, domain: impl Into<String>) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(Error::Validation("problem description must not be empty".into()));
        }
        Ok(Self {
            description,
            domain: domain.into(),
            complexity: 0.5,
            uncertainty: 0.5,
            time_sensitivity: 0.5,
            constraints: Vec::new(),
            stakeholders: Vec::new(),
            evidence: Vec::new(),
            goals: Vec::new(),
            complexity_label: None,
        })
    }

    #[must_use]
    pub fn complexity(&self) -> f64 {
        self.complexity
    }

    #[must_use]
    pub fn uncertainty(&self) -> f64 {
        self.uncertainty
    }

    #[must_use]
    pub fn time_sensitivity(&self) -> f64 {
        self.time_sensitivity
    }

    /// Sets `complexity`, rejecting values outside `[0,1]` rather than
    /// silently clamping — out-of-range scalars on construction are a
    /// validation error (§8 boundary behaviour).
    pub fn with_complexity(mut self, complexity: f64) -> Result<Self> {
        self.complexity = validate_unit_scalar(complexity, "complexity")?;
        Ok(self)
    }

    pub fn with_uncertainty(mut self, uncertainty: f64) -> Result<Self> {
        self.uncertainty = validate_unit_scalar(uncertainty, "uncertainty")?;
        Ok(self)
    }

    pub fn with_time_sensitivity(mut self, time_sensitivity: f64) -> Result<Self> {
        self.time_sensitivity = validate_unit_scalar(time_sensitivity, "time_sensitivity")?;
        Ok(self)
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: Vec<String>) -> Self {
        self.constraints = constraints;
        self
    }

    #[must_use]
    pub fn with_stakeholders(mut self, stakeholders: Vec<String>) -> Self {
        self.stakeholders = stakeholders;
        self
    }

    #[must_use]
    pub fn with_evidence(mut self, evidence: Vec<Evidence>) -> Self {
        self.evidence = evidence;
        self
    }

    #[must_use]
    pub fn with_goals(mut self, goals: Vec<String>) -> Self {
        self.goals = goals;
        self
    }

    #[must_use]
    pub fn with_complexity_label(mut self, label: impl Into<String>) -> Self {
        self.complexity_label = Some(label.into());
        self
    }
}

fn validate_unit_scalar(value: f64, field: &str) -> Result<f64> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(Error::Validation(format!(
            "{field} must be a finite number in [0,1], got {value}"
        )));
    }
    Ok(value)
}

/// Optional situational context accompanying a `Problem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    pub domain: Option<String>,
    pub problem_type: Option<String>,
    #[serde(default)]
    pub extras: HashMap<String, String>,
}

/// A raw evidentiary input supplied with the problem, distinct from the
/// evidence typed and extracted by `evidence::extract` over reasoning text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub content: String,
    pub source: String,
    reliability: f64,
    relevance: f64,
}

impl Evidence {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        Ok(Self {
            content: content.into(),
            source: source.into(),
            reliability: 0.5,
            relevance: 0.5,
        })
    }

    #[must_use]
    pub fn reliability(&self) -> f64 {
        self.reliability
    }

    #[must_use]
    pub fn relevance(&self) -> f64 {
        self.relevance
    }

    pub fn with_reliability(mut self, reliability: f64) -> Result<Self> {
        self.reliability = validate_unit_scalar(reliability, "reliability")?;
        Ok(self)
    }

    pub fn with_relevance(mut self, relevance: f64) -> Result<Self> {
        self.relevance = validate_unit_scalar(relevance, "relevance")?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_description() {
        assert!(Problem::new("   ", "ops").is_err());
    }

    #[test]
    fn rejects_out_of_range_complexity() {
        let problem = Problem::new("optimise the pipeline", "ops").unwrap();
        assert!(problem.with_complexity(1.5).is_err());
        assert!(problem.clone().with_complexity(-0.1).is_err());
    }

    #[test]
    fn accepts_boundary_scalars() {
        let problem = Problem::new("optimise the pipeline", "ops")
            .unwrap()
            .with_complexity(1.0)
            .unwrap()
            .with_uncertainty(0.0)
            .unwrap();
        assert_eq!(problem.complexity(), 1.0);
        assert_eq!(problem.uncertainty(), 0.0);
    }
}
