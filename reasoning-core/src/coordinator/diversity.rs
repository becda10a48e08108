//! Diversity scoring over a set of stream conclusions (`spec.md` §4.7, §GLOSSARY).

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::streams::StreamResult;

use super::types::DiversityReport;

fn words(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    if union == 0.0 {
        1.0
    } else {
        intersection / union
    }
}

/// `1 − mean(Jaccard(words(conclusion_i), words(conclusion_j)))` over
/// unordered pairs of joined conclusions; single-result case is defined
/// as maximally diverse (1.0).
#[must_use]
pub fn diversity_score(results: &[StreamResult]) -> f64 {
    if results.len() < 2 {
        return 1.0;
    }
    let word_sets: Vec<HashSet<String>> = results.iter().map(|r| words(&r.conclusions.join(" "))).collect();
    let mut total = 0.0;
    let mut pairs = 0;
    for i in 0..word_sets.len() {
        for j in (i + 1)..word_sets.len() {
            total += jaccard(&word_sets[i], &word_sets[j]);
            pairs += 1;
        }
    }
    let mean_similarity = if pairs == 0 { 0.0 } else { total / pairs as f64 };
    (1.0 - mean_similarity).clamp(0.0, 1.0)
}

/// Builds the full diversity report: the score, whether it crosses the
/// alert threshold, and whether a low-diversity reading is natural
/// convergence (high mean confidence) rather than a problem.
#[must_use]
pub fn assess(results: &[StreamResult], config: &EngineConfig) -> DiversityReport {
    let diversity = diversity_score(results);
    let mean_confidence = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64
    };
    let below_threshold = diversity < config.diversity_alert_threshold;
    let natural_convergence = below_threshold && mean_confidence > config.natural_convergence_confidence;
    DiversityReport {
        diversity,
        alert: below_threshold && !natural_convergence,
        natural_convergence,
    }
}
