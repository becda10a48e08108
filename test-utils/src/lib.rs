//! # test-utils
//!
//! Shared fixture builders for the reasoning-core, memory-store and
//! tool-server test suites. Nothing here is exercised by production code;
//! it exists purely to keep the same handful of "build me a problem /
//! pattern / memory" constructions out of every crate's test module.

use chrono::Utc;
use uuid::Uuid;

use memory_store::{Memory, Sector, Tag};
use reasoning_core::pattern::{Catalogue, Hypothesis, Indicator, IndicatorType, Pattern, Recommendation, RecommendationType, Severity};
use reasoning_core::problem::{Evidence, Problem};
use reasoning_core::step::{ReasoningStep, ReasoningStepType};

/// A problem with a deliberately bland description and default scalars,
/// for tests that only care about structure, not content.
#[must_use]
pub fn create_test_problem(description: &str) -> Problem {
    Problem::new(description, "testing").expect("non-empty description")
}

/// A problem with the given domain and complexity/uncertainty scalars.
#[must_use]
pub fn create_test_problem_with_scalars(description: &str, domain: &str, complexity: f64, uncertainty: f64) -> Problem {
    Problem::new(description, domain)
        .expect("non-empty description")
        .with_complexity(complexity)
        .expect("complexity in [0,1]")
        .with_uncertainty(uncertainty)
        .expect("uncertainty in [0,1]")
}

/// A piece of supporting evidence with the given reliability.
#[must_use]
pub fn create_test_evidence(content: &str, reliability: f64) -> Evidence {
    Evidence::new(content, "test-fixture").expect("non-empty content").with_reliability(reliability).expect("reliability in [0,1]")
}

/// A reasoning step of the given type and confidence.
#[must_use]
pub fn create_test_step(kind: ReasoningStepType, content: &str, confidence: f64) -> ReasoningStep {
    ReasoningStep::new(kind, content, confidence)
}

/// `n` reasoning steps sharing the same (suspiciously uniform) confidence,
/// useful for exercising the confirmation-bias detector.
#[must_use]
pub fn create_uniform_confidence_steps(n: usize, confidence: f64) -> Vec<ReasoningStep> {
    (0..n).map(|i| ReasoningStep::new(ReasoningStepType::LogicalInference, format!("step {i}"), confidence)).collect()
}

/// A minimal, valid pattern: one exact indicator, one hypothesis, one
/// recommendation. Every field is filled with a placeholder a caller can
/// override via the returned `Pattern`'s public fields.
#[must_use]
pub fn create_test_pattern(id: &str) -> Pattern {
    Pattern {
        id: id.to_string(),
        name: format!("{id} pattern"),
        description: "a test fixture pattern".into(),
        severity: Severity::Medium,
        quality_threshold: 0.3,
        indicators: vec![Indicator { kind: IndicatorType::Exact, value: "latency".into(), weight: 1.0, key_term_category: None }],
        negative_indicators: vec![],
        hypotheses: vec![Hypothesis {
            id: format!("{id}-h1"),
            statement: format!("{id} hypothesis statement"),
            investigation_steps: vec!["check the logs".into()],
            expected_findings: vec!["an anomaly".into()],
            related_hypotheses: vec![],
            estimated_time: "30m".into(),
            likelihood: 0.6,
        }],
        recommendations: vec![Recommendation {
            id: format!("{id}-r1"),
            kind: RecommendationType::Diagnostic,
            action: format!("investigate {id}"),
            tools: vec![],
            expected_outcome: "root cause identified".into(),
            prerequisites: vec![],
            priority: 5,
            documentation_links: None,
        }],
    }
}

/// A one-pattern catalogue wrapping [`create_test_pattern`].
#[must_use]
pub fn create_test_catalogue(domain: &str) -> Catalogue {
    Catalogue { version: "1.0.0".into(), domain: domain.to_string(), description: "test fixture catalogue".into(), patterns: vec![create_test_pattern("p1")], test_cases: vec![] }
}

/// A memory owned by `user_id` with default salience/strength.
#[must_use]
pub fn create_test_memory(user_id: &str, content: &str) -> Memory {
    Memory::new(user_id, content, Sector::Episodic)
}

/// `count` memories owned by the same user, distinguished only by content.
#[must_use]
pub fn create_test_memories(user_id: &str, count: usize) -> Vec<Memory> {
    (0..count).map(|i| Memory::new(user_id, format!("memory {i}"), Sector::Episodic)).collect()
}

/// A standalone tag row, not yet persisted or associated with any memory.
#[must_use]
pub fn create_test_tag(user_id: &str, path: &str) -> Tag {
    Tag { id: Uuid::new_v4(), user_id: user_id.to_string(), name: path.to_string(), path: path.to_string(), color: None, created_at: Utc::now() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_well_formed_problem() {
        let problem = create_test_problem("investigate the outage");
        assert_eq!(problem.domain, "testing");
    }

    #[test]
    fn builds_a_valid_pattern() {
        let pattern = create_test_pattern("p1");
        assert_eq!(pattern.indicators.len(), 1);
        assert_eq!(pattern.hypotheses.len(), 1);
    }

    #[test]
    fn uniform_confidence_steps_share_one_value() {
        let steps = create_uniform_confidence_steps(3, 0.95);
        assert!(steps.iter().all(|s| (s.confidence() - 0.95).abs() < f64::EPSILON));
    }
}
