//! Matches problem text against a loaded `PatternRegistry` (`spec.md`
//! §4.4 step 2-3).

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pattern::keyterms::KeyTerms;
use crate::pattern::registry::PatternRegistry;
use crate::pattern::types::{Hypothesis, Indicator, IndicatorType, KeyTermCategory, Pattern, Recommendation};

/// Similarity threshold above which a `fuzzy` indicator counts as a match.
const FUZZY_SIMILARITY_THRESHOLD: f64 = 0.8;

/// A surviving pattern match, still carrying unsubstituted hypothesis and
/// recommendation templates — substitution is the Insight Generator's job
/// (`spec.md` §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternMatchResult {
    pub pattern_id: String,
    pub domain: String,
    pub confidence: f64,
    pub matched_indicators: Vec<String>,
    pub hypotheses: Vec<Hypothesis>,
    pub recommendations: Vec<Recommendation>,
}

/// Matches `problem_text` against every pattern in `registry`, returning
/// only patterns whose indicator score meets their own `quality_threshold`.
#[must_use]
pub fn match_patterns(
    registry: &PatternRegistry,
    problem_text: &str,
    domain: &str,
    key_terms: &KeyTerms,
) -> Vec<PatternMatchResult> {
    registry
        .patterns()
        .iter()
        .filter_map(|pattern| match_one(pattern, problem_text, domain, key_terms))
        .collect()
}

fn match_one(
    pattern: &Pattern,
    problem_text: &str,
    domain: &str,
    key_terms: &KeyTerms,
) -> Option<PatternMatchResult> {
    let mut matched_indicators = Vec::new();
    let positive: f64 = pattern
        .indicators
        .iter()
        .map(|indicator| score_indicator(indicator, problem_text, key_terms, &mut matched_indicators))
        .sum();
    let negative: f64 = pattern
        .negative_indicators
        .iter()
        .map(|indicator| score_indicator(indicator, problem_text, key_terms, &mut Vec::new()))
        .sum();

    let total_weight: f64 = pattern.indicators.iter().map(|i| i.weight).sum::<f64>().max(1e-9);
    let confidence = ((positive - negative) / total_weight).clamp(0.0, 1.0);

    if confidence < pattern.quality_threshold {
        return None;
    }

    Some(PatternMatchResult {
        pattern_id: pattern.id.clone(),
        domain: domain.to_string(),
        confidence,
        matched_indicators,
        hypotheses: pattern.hypotheses.clone(),
        recommendations: pattern.recommendations.clone(),
    })
}

fn score_indicator(
    indicator: &Indicator,
    problem_text: &str,
    key_terms: &KeyTerms,
    matched_indicators: &mut Vec<String>,
) -> f64 {
    let matched = match indicator.kind {
        IndicatorType::Exact => problem_text.to_lowercase().contains(&indicator.value.to_lowercase()),
        IndicatorType::Fuzzy => problem_text
            .to_lowercase()
            .split_whitespace()
            .any(|word| strsim::normalized_levenshtein(word, &indicator.value.to_lowercase()) >= FUZZY_SIMILARITY_THRESHOLD),
        IndicatorType::Regex => Regex::new(&indicator.value)
            .map(|re| re.is_match(problem_text))
            .unwrap_or(false),
    };

    if !matched {
        return 0.0;
    }

    matched_indicators.push(indicator.value.clone());

    let multiplier = indicator
        .key_term_category
        .map(|category| if category_contains(category, key_terms, &indicator.value) { 1.5 } else { 1.0 })
        .unwrap_or(1.0);

    indicator.weight * multiplier
}

fn category_contains(category: KeyTermCategory, key_terms: &KeyTerms, value: &str) -> bool {
    let value_lower = value.to_lowercase();
    match category {
        KeyTermCategory::PrimarySubject => {
            key_terms.primary_subject.as_deref().is_some_and(|s| s == value_lower)
        }
        KeyTermCategory::DomainTerms => key_terms.domain_terms.iter().any(|t| *t == value_lower),
        KeyTermCategory::ActionVerbs => key_terms.action_verbs.iter().any(|t| *t == value_lower),
        KeyTermCategory::NounPhrases => key_terms.noun_phrases.iter().any(|t| t.contains(&value_lower)),
        KeyTermCategory::Terms => key_terms.terms.iter().any(|t| *t == value_lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::keyterms::extract_key_terms;
    use crate::pattern::registry::PatternRegistry;
    use crate::pattern::types::{Catalogue, Hypothesis, Recommendation, RecommendationType, Severity};

    fn pattern_with_indicator(value: &str, threshold: f64) -> Pattern {
        Pattern {
            id: "latency_pattern".into(),
            name: "Latency regression".into(),
            description: "desc".into(),
            severity: Severity::High,
            quality_threshold: threshold,
            indicators: vec![Indicator {
                kind: IndicatorType::Exact,
                value: value.into(),
                weight: 1.0,
                key_term_category: None,
            }],
            negative_indicators: vec![],
            hypotheses: vec![Hypothesis {
                id: "h1".into(),
                statement: "{{primarySubject}} may be resource-starved".into(),
                investigation_steps: vec!["check metrics".into()],
                expected_findings: vec!["elevated CPU".into()],
                related_hypotheses: vec![],
                estimated_time: "30m".into(),
                likelihood: 0.6,
            }],
            recommendations: vec![Recommendation {
                id: "r1".into(),
                kind: RecommendationType::Diagnostic,
                action: "gather metrics for {{domainTerms}}".into(),
                tools: vec![],
                expected_outcome: "root cause identified".into(),
                prerequisites: vec![],
                priority: 8,
                documentation_links: None,
            }],
        }
    }

    #[test]
    fn matches_and_scores_exact_indicator() {
        let mut registry = PatternRegistry::empty();
        registry
            .load_catalogue(Catalogue {
                version: "1.0.0".into(),
                domain: "ops".into(),
                description: "d".into(),
                patterns: vec![pattern_with_indicator("latency", 0.5)],
                test_cases: vec![],
            })
            .unwrap();

        let key_terms = extract_key_terms("The API latency has increased significantly.");
        let results = match_patterns(&registry, "The API latency has increased significantly.", "ops", &key_terms);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].pattern_id, "latency_pattern");
        assert!(results[0].confidence >= 0.5);
    }

    #[test]
    fn drops_patterns_below_quality_threshold() {
        let mut registry = PatternRegistry::empty();
        registry
            .load_catalogue(Catalogue {
                version: "1.0.0".into(),
                domain: "ops".into(),
                description: "d".into(),
                patterns: vec![pattern_with_indicator("latency", 0.99)],
                test_cases: vec![],
            })
            .unwrap();

        let key_terms = extract_key_terms("unrelated text entirely");
        let results = match_patterns(&registry, "unrelated text entirely", "ops", &key_terms);
        assert!(results.is_empty());
    }
}
