//! C3 — Multi-dimensional Confidence Assessor.
//!
//! Produces a calibrated `ConfidenceAssessment` across four dimensions plus
//! an uncertainty-type classification (`spec.md` §4.3). Internally
//! reentrant: callers may invoke `assess` concurrently from multiple
//! request threads, as it holds no shared mutable state.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::{CalibrationModel, ConfidenceWeights};
use crate::evidence::count_score;
use crate::problem::{Context, Evidence, Problem};

/// The classification of uncertainty driving the `uncertainty_level` score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyType {
    Epistemic,
    Aleatory,
    Ambiguity,
}

/// One scored dimension contributing to `overall`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceFactor {
    pub dimension: String,
    pub score: f64,
    pub weight: f64,
    pub explanation: String,
}

/// The full multi-dimensional assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub overall: f64,
    pub evidence_quality: f64,
    pub reasoning_coherence: f64,
    pub completeness: f64,
    pub uncertainty_level: f64,
    pub uncertainty_type: UncertaintyType,
    pub factors: Vec<ConfidenceFactor>,
    pub latency_ms: u64,
}

/// Everything the assessor needs: the problem plus whatever has been
/// aggregated about the reasoning run so far.
pub struct ReasoningContext<'a> {
    pub problem: &'a Problem,
    pub context: Option<&'a Context>,
    pub evidence: &'a [Evidence],
    pub goals: &'a [String],
    pub constraints: &'a [String],
    pub framework: Option<&'a str>,
}

/// Assesses confidence for `ctx`. Targets < 100 ms on the reference
/// workload; always reports at least 1 ms of latency.
#[must_use]
pub fn assess(
    ctx: &ReasoningContext<'_>,
    weights: &ConfidenceWeights,
    calibration: Option<&CalibrationModel>,
) -> ConfidenceAssessment {
    let started = Instant::now();

    let evidence_quality = evidence_quality(ctx.evidence);
    let reasoning_coherence = reasoning_coherence(ctx);
    let completeness = completeness(ctx);
    let uncertainty_type = classify_uncertainty_type(ctx);
    let uncertainty_level = uncertainty_level(ctx, uncertainty_type);

    let factors = vec![
        ConfidenceFactor {
            dimension: "evidence_quality".into(),
            score: evidence_quality,
            weight: weights.evidence,
            explanation: format!("{} evidence item(s) assessed for count, diversity and substance", ctx.evidence.len()),
        },
        ConfidenceFactor {
            dimension: "reasoning_coherence".into(),
            score: reasoning_coherence,
            weight: weights.coherence,
            explanation: "mean of description/context length, constraint and goal coverage, and framework selection signals".into(),
        },
        ConfidenceFactor {
            dimension: "completeness".into(),
            score: completeness,
            weight: weights.completeness,
            explanation: "baseline plus evidence/goal ratio, constraint and complexity-label presence".into(),
        },
        ConfidenceFactor {
            dimension: "uncertainty".into(),
            score: 1.0 - uncertainty_level,
            weight: weights.uncertainty,
            explanation: format!("uncertainty classified as {uncertainty_type:?} at level {uncertainty_level:.2}"),
        },
    ];

    let raw_overall: f64 = factors.iter().map(|f| f.score * f.weight).sum::<f64>().clamp(0.0, 1.0);
    let overall = calibration.map_or(raw_overall, |c| c.apply(raw_overall));

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let latency_ms = elapsed_ms.max(1);

    ConfidenceAssessment {
        overall,
        evidence_quality,
        reasoning_coherence,
        completeness,
        uncertainty_level,
        uncertainty_type,
        factors,
        latency_ms,
    }
}

fn evidence_quality(evidence: &[Evidence]) -> f64 {
    if evidence.is_empty() {
        return 0.0;
    }
    let unique_sources: std::collections::HashSet<&str> =
        evidence.iter().map(|e| e.source.as_str()).collect();
    let diversity = (unique_sources.len() as f64 / 4.0).min(1.0);
    let substance = evidence.iter().filter(|e| e.content.len() > 10).count() as f64 / evidence.len() as f64;
    (count_score(evidence.len()) * 0.5 + diversity * 0.25 + substance * 0.25).clamp(0.0, 1.0)
}

fn reasoning_coherence(ctx: &ReasoningContext<'_>) -> f64 {
    let mut signals = vec![
        (ctx.problem.description.len() as f64 / 20.0).min(1.0),
        (ctx.constraints.len() as f64 / 3.0).min(1.0),
        (ctx.goals.len() as f64 / 3.0).min(1.0),
        if ctx.framework.is_some() { 1.0 } else { 0.0 },
    ];
    if let Some(context) = ctx.context {
        let context_len = context
            .domain
            .as_deref()
            .unwrap_or_default()
            .len()
            .max(context.problem_type.as_deref().unwrap_or_default().len());
        signals.push((context_len as f64 / 20.0).min(1.0));
    }
    if !ctx.evidence.is_empty() && !ctx.goals.is_empty() {
        signals.push(0.5);
    }
    mean(&signals)
}

fn completeness(ctx: &ReasoningContext<'_>) -> f64 {
    let mut signals = vec![0.5];
    if !ctx.goals.is_empty() && !ctx.evidence.is_empty() {
        signals.push((ctx.evidence.len() as f64 / ctx.goals.len() as f64 / 2.0).min(1.0));
    }
    if !ctx.constraints.is_empty() {
        signals.push(0.5);
    }
    if ctx.problem.complexity_label.is_some() {
        signals.push(0.5);
    }
    if !ctx.evidence.is_empty() && !ctx.goals.is_empty() {
        signals.push(1.0);
    }
    mean(&signals)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

const AMBIGUITY_TERMS: [&str; 4] = ["multiple", "ambiguous", "unclear", "various"];

fn classify_uncertainty_type(ctx: &ReasoningContext<'_>) -> UncertaintyType {
    if ctx.evidence.len() < 2 || (ctx.goals.is_empty() && ctx.constraints.is_empty()) {
        return UncertaintyType::Epistemic;
    }
    let description_lower = ctx.problem.description.to_lowercase();
    if ctx.evidence.len() >= 3 || AMBIGUITY_TERMS.iter().any(|t| description_lower.contains(t)) {
        return UncertaintyType::Ambiguity;
    }
    UncertaintyType::Aleatory
}

fn uncertainty_level(ctx: &ReasoningContext<'_>, uncertainty_type: UncertaintyType) -> f64 {
    let base = match uncertainty_type {
        UncertaintyType::Epistemic => (1.0 - 0.1 * ctx.evidence.len() as f64).max(0.6),
        UncertaintyType::Ambiguity => 0.6,
        UncertaintyType::Aleatory => 0.4,
    };
    let adjusted = match ctx.problem.complexity_label.as_deref() {
        Some("complex") => base + 0.1,
        Some("simple") => base - 0.1,
        _ => base,
    };
    adjusted.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfidenceWeights;

    fn evidence(n: usize) -> Vec<Evidence> {
        (0..n)
            .map(|i| Evidence::new(format!("evidence item number {i}"), format!("source-{i}")).unwrap())
            .collect()
    }

    #[test]
    fn epistemic_for_single_evidence_item() {
        let problem = Problem::new("optimise X", "ops").unwrap();
        let ev = evidence(1);
        let ctx = ReasoningContext {
            problem: &problem,
            context: None,
            evidence: &ev,
            goals: &[],
            constraints: &[],
            framework: None,
        };
        let assessment = assess(&ctx, &ConfidenceWeights::default(), None);
        assert_eq!(assessment.uncertainty_type, UncertaintyType::Epistemic);
        assert!(assessment.uncertainty_level >= 0.6);
    }

    #[test]
    fn aleatory_for_well_formed_moderate_problem() {
        let problem = Problem::new("plan Y", "ops")
            .unwrap()
            .with_complexity_label("moderate");
        let ev = evidence(3);
        let goals = vec!["g1".to_string()];
        let constraints = vec!["c1".to_string()];
        let ctx = ReasoningContext {
            problem: &problem,
            context: None,
            evidence: &ev,
            goals: &goals,
            constraints: &constraints,
            framework: None,
        };
        let assessment = assess(&ctx, &ConfidenceWeights::default(), None);
        // 3 evidence items triggers the Ambiguity branch ahead of Aleatory,
        // per the priority order in spec.md 4.3.
        assert_eq!(assessment.uncertainty_type, UncertaintyType::Ambiguity);
    }

    #[test]
    fn empty_evidence_yields_zero_evidence_quality() {
        assert_eq!(evidence_quality(&[]), 0.0);
    }

    #[test]
    fn three_evidence_items_saturate_count_score() {
        assert_eq!(count_score(3), 1.0);
    }

    #[test]
    fn overall_respects_weight_distribution() {
        let problem = Problem::new("optimise X", "ops").unwrap();
        let ctx = ReasoningContext {
            problem: &problem,
            context: None,
            evidence: &[],
            goals: &[],
            constraints: &[],
            framework: None,
        };
        let assessment = assess(&ctx, &ConfidenceWeights::default(), None);
        let expected: f64 = assessment.factors.iter().map(|f| f.score * f.weight).sum();
        assert!((assessment.overall - expected.clamp(0.0, 1.0)).abs() < 1e-9);
    }

    #[test]
    fn factor_weights_sum_to_one() {
        let weights = ConfidenceWeights::default();
        let sum = weights.evidence + weights.coherence + weights.completeness + weights.uncertainty;
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
