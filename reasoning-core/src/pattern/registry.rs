//! Loads and validates pattern catalogues at startup. The registry is
//! immutable once built and may be shared freely by concurrent matchers
//! (`spec.md` §5).

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::pattern::types::{Catalogue, Pattern};

static SEMVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$").unwrap());

/// A read-only, validated snapshot of loaded patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: Vec<Pattern>,
}

impl PatternRegistry {
    /// Builds an empty registry (no patterns loaded).
    #[must_use]
    pub fn empty() -> Self {
        Self { patterns: Vec::new() }
    }

    /// Loads one catalogue document (already parsed from TOML/JSON),
    /// validating every invariant in `spec.md` §3. A catalogue that fails
    /// any invariant is rejected wholesale: none of its patterns enter the
    /// registry.
    pub fn load_catalogue(&mut self, catalogue: Catalogue) -> Result<usize> {
        validate_catalogue(&catalogue)?;
        let added = catalogue.patterns.len();
        info!(domain = %catalogue.domain, version = %catalogue.version, patterns = added, "loaded pattern catalogue");
        self.patterns.extend(catalogue.patterns);
        Ok(added)
    }

    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn validate_catalogue(catalogue: &Catalogue) -> Result<()> {
    if !SEMVER_RE.is_match(&catalogue.version) {
        return Err(Error::Validation(format!(
            "catalogue version '{}' is not valid semver",
            catalogue.version
        )));
    }
    if catalogue.patterns.is_empty() {
        return Err(Error::Validation("catalogue must declare at least one pattern".into()));
    }
    for pattern in &catalogue.patterns {
        validate_pattern(pattern)?;
    }
    Ok(())
}

fn validate_pattern(pattern: &Pattern) -> Result<()> {
    if pattern.id.trim().is_empty() {
        return Err(Error::Validation("pattern id must not be empty".into()));
    }
    if pattern.indicators.is_empty() {
        return Err(Error::Validation(format!(
            "pattern '{}' must declare at least one indicator",
            pattern.id
        )));
    }
    if pattern.hypotheses.is_empty() {
        return Err(Error::Validation(format!(
            "pattern '{}' must declare at least one hypothesis",
            pattern.id
        )));
    }
    if pattern.recommendations.is_empty() {
        return Err(Error::Validation(format!(
            "pattern '{}' must declare at least one recommendation",
            pattern.id
        )));
    }
    if !(0.0..=1.0).contains(&pattern.quality_threshold) {
        return Err(Error::Validation(format!(
            "pattern '{}' quality_threshold must be in [0,1]",
            pattern.id
        )));
    }
    for indicator in pattern.indicators.iter().chain(pattern.negative_indicators.iter()) {
        if !(0.0..=1.0).contains(&indicator.weight) {
            return Err(Error::Validation(format!(
                "pattern '{}' has an indicator weight outside [0,1]",
                pattern.id
            )));
        }
        if indicator.value.trim().is_empty() {
            return Err(Error::Validation(format!(
                "pattern '{}' has an indicator with an empty value",
                pattern.id
            )));
        }
    }
    for hypothesis in &pattern.hypotheses {
        if hypothesis.investigation_steps.is_empty() {
            return Err(Error::Validation(format!(
                "hypothesis '{}' must declare at least one investigation step",
                hypothesis.id
            )));
        }
        if hypothesis.expected_findings.is_empty() {
            return Err(Error::Validation(format!(
                "hypothesis '{}' must declare at least one expected finding",
                hypothesis.id
            )));
        }
        if !(0.0..=1.0).contains(&hypothesis.likelihood) {
            return Err(Error::Validation(format!(
                "hypothesis '{}' likelihood must be in [0,1]",
                hypothesis.id
            )));
        }
    }
    for recommendation in &pattern.recommendations {
        if !(1..=10).contains(&recommendation.priority) {
            return Err(Error::Validation(format!(
                "recommendation '{}' priority must be an integer in [1,10]",
                recommendation.id
            )));
        }
    }
    if pattern.indicators.iter().any(|i| i.weight == 0.0) {
        warn!(pattern = %pattern.id, "pattern has a zero-weight indicator; it can never contribute to a match");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::types::{
        Hypothesis, Indicator, IndicatorType, Recommendation, RecommendationType, Severity,
    };

    fn minimal_pattern(id: &str) -> Pattern {
        Pattern {
            id: id.to_string(),
            name: "Test pattern".into(),
            description: "desc".into(),
            severity: Severity::Medium,
            quality_threshold: 0.5,
            indicators: vec![Indicator {
                kind: IndicatorType::Exact,
                value: "latency".into(),
                weight: 1.0,
                key_term_category: None,
            }],
            negative_indicators: vec![],
            hypotheses: vec![Hypothesis {
                id: "h1".into(),
                statement: "statement".into(),
                investigation_steps: vec!["step".into()],
                expected_findings: vec!["finding".into()],
                related_hypotheses: vec![],
                estimated_time: "1h".into(),
                likelihood: 0.5,
            }],
            recommendations: vec![Recommendation {
                id: "r1".into(),
                kind: RecommendationType::Diagnostic,
                action: "action".into(),
                tools: vec![],
                expected_outcome: "outcome".into(),
                prerequisites: vec![],
                priority: 5,
                documentation_links: None,
            }],
        }
    }

    fn minimal_catalogue(patterns: Vec<Pattern>) -> Catalogue {
        Catalogue {
            version: "1.0.0".into(),
            domain: "ops".into(),
            description: "test catalogue".into(),
            patterns,
            test_cases: vec![],
        }
    }

    #[test]
    fn accepts_well_formed_catalogue() {
        let mut registry = PatternRegistry::empty();
        let added = registry.load_catalogue(minimal_catalogue(vec![minimal_pattern("p1")])).unwrap();
        assert_eq!(added, 1);
        assert_eq!(registry.patterns().len(), 1);
    }

    #[test]
    fn rejects_catalogue_with_bad_semver() {
        let mut catalogue = minimal_catalogue(vec![minimal_pattern("p1")]);
        catalogue.version = "not-a-version".into();
        let mut registry = PatternRegistry::empty();
        assert!(registry.load_catalogue(catalogue).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn rejects_pattern_with_no_indicators() {
        let mut pattern = minimal_pattern("p1");
        pattern.indicators.clear();
        let mut registry = PatternRegistry::empty();
        assert!(registry.load_catalogue(minimal_catalogue(vec![pattern])).is_err());
    }

    #[test]
    fn rejects_out_of_range_priority() {
        let mut pattern = minimal_pattern("p1");
        pattern.recommendations[0].priority = 11;
        let mut registry = PatternRegistry::empty();
        assert!(registry.load_catalogue(minimal_catalogue(vec![pattern])).is_err());
    }

    #[test]
    fn a_single_bad_pattern_rejects_the_whole_catalogue() {
        let good = minimal_pattern("good");
        let mut bad = minimal_pattern("bad");
        bad.hypotheses.clear();
        let mut registry = PatternRegistry::empty();
        assert!(registry.load_catalogue(minimal_catalogue(vec![good, bad])).is_err());
        assert!(registry.is_empty());
    }
}
