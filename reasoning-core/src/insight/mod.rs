//! C5 — Insight Generator.
//!
//! Consumes `PatternMatchResult`s, key terms and the original problem to
//! produce an ordered, deduplicated, template-substituted set of
//! hypotheses and recommendations, with a principled fallback when
//! nothing matched (`spec.md` §4.5).

pub mod supplemental;
pub mod templates;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::pattern::{Hypothesis, KeyTerms, PatternMatchResult, Recommendation};

/// A hypothesis tagged with the pattern (or `"supplemental"`/`"fallback"`)
/// it originated from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightHypothesis {
    pub source_pattern_id: String,
    #[serde(flatten)]
    pub hypothesis: Hypothesis,
}

/// A recommendation tagged with its originating pattern (or
/// `"fallback"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightRecommendation {
    pub source: String,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}

/// The Insight Generator's final, ready-to-render output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightResponse {
    pub hypotheses: Vec<InsightHypothesis>,
    pub recommendations: Vec<InsightRecommendation>,
    pub overall_confidence: f64,
    pub used_fallback: bool,
}

/// Generates the final insight response from the matcher's surviving
/// pattern matches.
#[must_use]
pub fn generate(matches: &[PatternMatchResult], key_terms: &KeyTerms, config: &EngineConfig) -> InsightResponse {
    let filtered: Vec<&PatternMatchResult> = matches
        .iter()
        .filter(|m| m.confidence >= config.min_insight_confidence)
        .collect();

    if filtered.is_empty() {
        return if config.fallback_enabled {
            build_fallback(key_terms)
        } else {
            InsightResponse {
                hypotheses: vec![],
                recommendations: vec![],
                overall_confidence: 0.0,
                used_fallback: false,
            }
        };
    }

    let mut hypotheses: Vec<InsightHypothesis> = filtered
        .iter()
        .flat_map(|m| {
            m.hypotheses.iter().map(|h| InsightHypothesis {
                source_pattern_id: m.pattern_id.clone(),
                hypothesis: substitute_hypothesis(h, key_terms),
            })
        })
        .collect();
    hypotheses.sort_by(|a, b| b.hypothesis.likelihood.total_cmp(&a.hypothesis.likelihood));

    if hypotheses.len() < config.min_hypotheses_on_match {
        for supplemental in supplemental::supplemental_pool() {
            if hypotheses.len() >= config.min_hypotheses_on_match {
                break;
            }
            hypotheses.push(InsightHypothesis {
                source_pattern_id: supplemental::SUPPLEMENTAL_SOURCE.to_string(),
                hypothesis: substitute_hypothesis(&supplemental, key_terms),
            });
        }
    }

    let mut recommendations: Vec<InsightRecommendation> = filtered
        .iter()
        .flat_map(|m| {
            m.recommendations.iter().map(|r| InsightRecommendation {
                source: m.pattern_id.clone(),
                recommendation: substitute_recommendation(r, key_terms),
            })
        })
        .collect();
    recommendations = order_recommendations(recommendations);

    let unique_domains = filtered
        .iter()
        .map(|m| m.domain.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len();
    let max_confidence = filtered.iter().map(|m| m.confidence).fold(0.0_f64, f64::max);
    let overall_confidence =
        (max_confidence + (0.1_f64).min(0.05 * (unique_domains.saturating_sub(1)) as f64)).clamp(0.0, 1.0);

    InsightResponse {
        hypotheses,
        recommendations,
        overall_confidence,
        used_fallback: false,
    }
}

fn build_fallback(key_terms: &KeyTerms) -> InsightResponse {
    let hypotheses = supplemental::fallback_hypotheses()
        .iter()
        .map(|h| InsightHypothesis {
            source_pattern_id: supplemental::FALLBACK_SOURCE.to_string(),
            hypothesis: substitute_hypothesis(h, key_terms),
        })
        .collect();
    let mut recommendations: Vec<InsightRecommendation> = supplemental::fallback_recommendations()
        .iter()
        .map(|r| InsightRecommendation {
            source: supplemental::FALLBACK_SOURCE.to_string(),
            recommendation: substitute_recommendation(r, key_terms),
        })
        .collect();
    recommendations = order_recommendations(recommendations);

    InsightResponse {
        hypotheses,
        recommendations,
        overall_confidence: 0.5,
        used_fallback: true,
    }
}

fn substitute_hypothesis(hypothesis: &Hypothesis, key_terms: &KeyTerms) -> Hypothesis {
    let mut h = hypothesis.clone();
    h.statement = templates::substitute(&h.statement, key_terms);
    h.investigation_steps = h.investigation_steps.iter().map(|s| templates::substitute(s, key_terms)).collect();
    h
}

fn substitute_recommendation(recommendation: &Recommendation, key_terms: &KeyTerms) -> Recommendation {
    let mut r = recommendation.clone();
    r.action = templates::substitute(&r.action, key_terms);
    r.expected_outcome = templates::substitute(&r.expected_outcome, key_terms);
    r
}

/// Sorts by priority descending, then topologically reorders so every
/// recommendation appears after its prerequisites that are also present
/// in the output set. Cycles are broken by falling back to priority
/// order for whichever item cannot be placed.
fn order_recommendations(mut recs: Vec<InsightRecommendation>) -> Vec<InsightRecommendation> {
    recs.sort_by(|a, b| b.recommendation.priority.cmp(&a.recommendation.priority));

    let ids: std::collections::HashSet<String> =
        recs.iter().map(|r| r.recommendation.id.clone()).collect();
    let mut placed: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut remaining = recs;
    let mut ordered = Vec::new();

    while !remaining.is_empty() {
        let ready_index = remaining.iter().position(|r| {
            r.recommendation
                .prerequisites
                .iter()
                .filter(|p| ids.contains(*p))
                .all(|p| placed.contains(p))
        });
        let index = ready_index.unwrap_or(0);
        let rec = remaining.remove(index);
        placed.insert(rec.recommendation.id.clone());
        ordered.push(rec);
    }

    ordered
}
