//! The fixed supplemental and fallback hypothesis/recommendation pools
//! (`spec.md` §4.5). Both pools are literal constants, not generated, so
//! their ordering and likelihoods are exact and stable across runs.

use crate::pattern::{Hypothesis, Recommendation, RecommendationType};

/// Supplemental pool appended, in order, when at least one pattern matched
/// but fewer than `min_hypotheses_on_match` hypotheses survived.
pub const SUPPLEMENTAL_SOURCE: &str = "supplemental";

#[must_use]
pub fn supplemental_pool() -> Vec<Hypothesis> {
    vec![
        supplemental_hypothesis("resource_contention", "Resource contention on {{domainTerms}} is limiting throughput.", 0.35),
        supplemental_hypothesis("configuration", "A recent configuration change to {{primarySubject}} introduced the regression.", 0.30),
        supplemental_hypothesis("dependency", "An upstream dependency of {{primarySubject}} is degraded.", 0.25),
        supplemental_hypothesis("data_integrity", "Data integrity issues in {{domainTerms}} are producing the symptom.", 0.20),
    ]
}

fn supplemental_hypothesis(id: &str, statement: &str, likelihood: f64) -> Hypothesis {
    Hypothesis {
        id: format!("supplemental_{id}"),
        statement: statement.to_string(),
        investigation_steps: vec![format!("Review {id} indicators for {{{{primarySubject}}}}.")],
        expected_findings: vec!["Evidence confirming or ruling out this cause.".into()],
        related_hypotheses: vec![],
        estimated_time: "1h".into(),
        likelihood,
    }
}

/// Fallback pair emitted when zero patterns match and fallback is enabled.
pub const FALLBACK_SOURCE: &str = "fallback";

#[must_use]
pub fn fallback_hypotheses() -> Vec<Hypothesis> {
    vec![
        supplemental_hypothesis("resource_contention", "Resource contention on {{domainTerms}} is limiting throughput.", 0.5),
        supplemental_hypothesis("configuration", "A recent configuration change to {{primarySubject}} introduced the regression.", 0.4),
    ]
}

#[must_use]
pub fn fallback_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation {
            id: "gather_data".into(),
            kind: RecommendationType::Diagnostic,
            action: "Gather additional telemetry and logs for {{primarySubject}}.".into(),
            tools: vec!["logs".into(), "metrics".into()],
            expected_outcome: "Enough evidence to narrow down a root cause.".into(),
            prerequisites: vec![],
            priority: 9,
            documentation_links: None,
        },
        Recommendation {
            id: "isolate_issue".into(),
            kind: RecommendationType::Diagnostic,
            action: "Isolate {{primarySubject}} from the rest of the system to bound the failure.".into(),
            tools: vec!["feature flags".into()],
            expected_outcome: "The failure is reproduced or ruled out in isolation.".into(),
            prerequisites: vec!["gather_data".into()],
            priority: 8,
            documentation_links: None,
        },
    ]
}
