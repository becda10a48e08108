//! C1 — Evidence Extractor.
//!
//! Pattern-based extraction of evidentiary statements from reasoning text
//! (`spec.md` §4.1). Stateless: each call re-segments and re-scans from
//! scratch, so `extract(text)` is idempotent across repeated calls.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// The eight evidence types the catalogue recognises, in catalogue order.
/// At most one pattern fires per sentence: the first match in this order
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    Data,
    Study,
    Statistic,
    Fact,
    Observation,
    Reference,
    Example,
    Measurement,
}

/// A piece of evidence extracted from a sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEvidence {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: EvidenceType,
    pub confidence: f64,
}

/// Result of an extraction pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub evidence: Vec<ExtractedEvidence>,
    pub count: usize,
    pub quality: f64,
}

struct TypePattern {
    kind: EvidenceType,
    regex: &'static Regex,
    base_confidence: f64,
}

static DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdata\s+(?:shows?|indicates?|suggests?|reveals?)\b").unwrap()
});
static STUDY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:study|research|survey|analysis)\s+(?:found|shows?|indicates?|concluded)\b").unwrap()
});
static STATISTIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+(?:\.\d+)?\s*%|\bpercent\b").unwrap());
static FACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bin fact\b|\bit is (?:a\s+)?(?:known|established) that\b").unwrap());
static OBSERVATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:we|i|they)\s+(?:observed|noticed|saw|noted)\b").unwrap());
static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\baccording to\b|\bcited (?:in|by)\b|\bper\s+the\b").unwrap());
static EXAMPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfor example\b|\bsuch as\b|\be\.g\.\b").unwrap());
static MEASUREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(?:\.\d+)?\s*(?:ms|milliseconds?|seconds?|kg|meters?|km|mb|gb|requests?/s)\b").unwrap()
});

fn catalogue() -> [TypePattern; 8] {
    [
        TypePattern { kind: EvidenceType::Data, regex: &DATA_RE, base_confidence: 0.8 },
        TypePattern { kind: EvidenceType::Study, regex: &STUDY_RE, base_confidence: 0.85 },
        TypePattern { kind: EvidenceType::Statistic, regex: &STATISTIC_RE, base_confidence: 0.75 },
        TypePattern { kind: EvidenceType::Fact, regex: &FACT_RE, base_confidence: 0.65 },
        TypePattern { kind: EvidenceType::Observation, regex: &OBSERVATION_RE, base_confidence: 0.6 },
        TypePattern { kind: EvidenceType::Reference, regex: &REFERENCE_RE, base_confidence: 0.7 },
        TypePattern { kind: EvidenceType::Example, regex: &EXAMPLE_RE, base_confidence: 0.55 },
        TypePattern { kind: EvidenceType::Measurement, regex: &MEASUREMENT_RE, base_confidence: 0.8 },
    ]
}

/// Splits `text` into sentences on terminal punctuation (`.`, `!`, `?`).
fn segment_sentences(text: &str) -> Vec<String> {
    text.split(|c| c == '.' || c == '!' || c == '?')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Scans `text` for evidentiary statements. Never errors: empty or
/// non-textual input yields an empty, zero-quality result.
#[must_use]
pub fn extract(text: &str) -> ExtractionResult {
    let catalogue = catalogue();
    let mut evidence = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for sentence in segment_sentences(text) {
        let dedup_key = sentence.to_lowercase();
        if seen.contains(&dedup_key) {
            continue;
        }
        for pattern in &catalogue {
            if pattern.regex.is_match(&sentence) {
                seen.insert(dedup_key.clone());
                evidence.push(ExtractedEvidence {
                    content: sentence.clone(),
                    kind: pattern.kind,
                    confidence: pattern.base_confidence,
                });
                break;
            }
        }
    }

    let count = evidence.len();
    let quality = compute_quality(&evidence);

    ExtractionResult { evidence, count, quality }
}

/// The §4.1 quality formula, reused (with a minor weighting variant) by
/// the confidence assessor in §4.3.
#[must_use]
pub fn count_score(n: usize) -> f64 {
    let n = n as f64;
    if n <= 3.0 {
        n / 3.0
    } else if n <= 7.0 {
        0.9 + (n - 3.0) * 0.025
    } else {
        (1.0 - (n - 7.0) * 0.01).max(0.85)
    }
}

fn compute_quality(evidence: &[ExtractedEvidence]) -> f64 {
    if evidence.is_empty() {
        return 0.0;
    }
    let unique_types: std::collections::HashSet<EvidenceType> =
        evidence.iter().map(|e| e.kind).collect();
    let diversity_score = (unique_types.len() as f64 / 4.0).min(1.0);
    let avg_confidence = evidence.iter().map(|e| e.confidence).sum::<f64>() / evidence.len() as f64;
    let quality = 0.4 * count_score(evidence.len()) + 0.3 * diversity_score + 0.3 * avg_confidence;
    quality.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_zero_quality() {
        let result = extract("");
        assert_eq!(result.count, 0);
        assert_eq!(result.quality, 0.0);
        assert!(result.evidence.is_empty());
    }

    #[test]
    fn extracts_data_and_study_sentences() {
        let text = "The data shows a 40% increase in latency. The study found that user satisfaction dropped.";
        let result = extract(text);
        assert_eq!(result.count, 2);
        assert!(result.quality >= 0.6 && result.quality <= 0.9);
        let kinds: std::collections::HashSet<_> = result.evidence.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&EvidenceType::Data) || kinds.contains(&EvidenceType::Statistic));
        assert!(kinds.contains(&EvidenceType::Study));
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "The study found a correlation. According to the report, usage tripled.";
        let first = extract(text);
        let second = extract(text);
        assert_eq!(
            first.evidence.iter().map(|e| e.content.clone()).collect::<Vec<_>>(),
            second.evidence.iter().map(|e| e.content.clone()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn deduplicates_on_lowercase_trimmed_sentence() {
        let text = "The data shows growth. THE DATA SHOWS GROWTH.";
        let result = extract(text);
        assert_eq!(result.count, 1);
    }

    #[test]
    fn count_score_hits_one_at_exactly_three() {
        assert_eq!(count_score(3), 1.0);
    }

    #[test]
    fn at_most_one_pattern_fires_per_sentence() {
        // "data shows" would also match nothing else here; ensure a single
        // evidence item is produced, not one per matching pattern.
        let text = "The data shows a 40% jump, according to the report.";
        let result = extract(text);
        assert_eq!(result.count, 1);
        assert_eq!(result.evidence[0].kind, EvidenceType::Data);
    }
}
