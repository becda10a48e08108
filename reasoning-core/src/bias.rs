//! C2 — Bias Detector.
//!
//! Scans a reasoning transcript for four specific cognitive-bias signatures
//! (`spec.md` §4.2). Detectors are independent and may all fire on the same
//! transcript.

use serde::{Deserialize, Serialize};

use crate::step::ReasoningStep;

/// The bias kinds this detector recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasKind {
    Confirmation,
    Anchoring,
    Availability,
    Overconfidence,
}

/// A detected bias, with severity and a fixed mitigation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasDetection {
    pub kind: BiasKind,
    pub severity: f64,
    pub description: String,
    pub mitigation_suggestions: Vec<String>,
}

const AVAILABILITY_RECENCY_TERMS: [&str; 5] = ["recent", "lately", "just", "yesterday", "last week"];
const AVAILABILITY_VIVIDNESS_TERMS: [&str; 4] = ["dramatic", "shocking", "memorable", "vivid"];

/// Runs all four detectors over `steps`, returning zero or more hits.
#[must_use]
pub fn detect(steps: &[ReasoningStep]) -> Vec<BiasDetection> {
    let mut biases = Vec::new();

    if let Some(b) = detect_confirmation(steps) {
        biases.push(b);
    }
    if let Some(b) = detect_anchoring(steps) {
        biases.push(b);
    }
    if let Some(b) = detect_availability(steps) {
        biases.push(b);
    }
    if let Some(b) = detect_overconfidence(steps) {
        biases.push(b);
    }

    biases
}

fn detect_confirmation(steps: &[ReasoningStep]) -> Option<BiasDetection> {
    if steps.len() >= 3 && steps.iter().all(|s| s.confidence() > 0.8) {
        Some(BiasDetection {
            kind: BiasKind::Confirmation,
            severity: 0.6,
            description: format!(
                "All {} reasoning steps carry confidence above 0.8 with no step expressing doubt; \
                 the transcript may be selectively weighting confirming evidence.",
                steps.len()
            ),
            mitigation_suggestions: vec![
                "Actively seek disconfirming evidence before finalising the conclusion.".into(),
                "Assign a devil's-advocate pass to challenge each high-confidence step.".into(),
            ],
        })
    } else {
        None
    }
}

fn detect_anchoring(steps: &[ReasoningStep]) -> Option<BiasDetection> {
    let (first, rest) = steps.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mean_rest = rest.iter().map(ReasoningStep::confidence).sum::<f64>() / rest.len() as f64;
    if first.confidence() - mean_rest > 0.3 {
        Some(BiasDetection {
            kind: BiasKind::Anchoring,
            severity: 0.5,
            description: format!(
                "The first reasoning step's confidence ({:.2}) exceeds the mean of the \
                 remaining steps ({:.2}) by more than 0.3; later reasoning may be anchored \
                 to the initial judgment rather than independently evaluated.",
                first.confidence(),
                mean_rest
            ),
            mitigation_suggestions: vec![
                "Re-evaluate the initial step without reference to its stated confidence.".into(),
                "Generate an independent estimate before reviewing the first step.".into(),
            ],
        })
    } else {
        None
    }
}

fn detect_availability(steps: &[ReasoningStep]) -> Option<BiasDetection> {
    for step in steps {
        let lower = step.content.to_lowercase();
        let trigger = AVAILABILITY_RECENCY_TERMS
            .iter()
            .chain(AVAILABILITY_VIVIDNESS_TERMS.iter())
            .find(|term| lower.contains(*term));
        if let Some(term) = trigger {
            return Some(BiasDetection {
                kind: BiasKind::Availability,
                severity: 0.4,
                description: format!(
                    "Step content uses the term \"{term}\", suggesting a judgment based on \
                     what is easily recalled (recent or vivid) rather than systematic evidence."
                ),
                mitigation_suggestions: vec![
                    "Supplement the claim with base-rate or historical data.".into(),
                    "Ask whether the same conclusion would hold without the recent/vivid case.".into(),
                ],
            });
        }
    }
    None
}

fn detect_overconfidence(steps: &[ReasoningStep]) -> Option<BiasDetection> {
    if steps.len() < 3 {
        return None;
    }
    let mean = steps.iter().map(ReasoningStep::confidence).sum::<f64>() / steps.len() as f64;
    if mean > 0.85 {
        Some(BiasDetection {
            kind: BiasKind::Overconfidence,
            severity: 0.5,
            description: format!(
                "Mean confidence across {} steps is {:.2}, above the 0.85 overconfidence \
                 threshold; calibration against historical accuracy is recommended.",
                steps.len(),
                mean
            ),
            mitigation_suggestions: vec![
                "Widen uncertainty intervals and state what would change the conclusion.".into(),
                "Compare stated confidence against past calibration on similar problems.".into(),
            ],
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::ReasoningStepType;

    fn step(content: &str, confidence: f64) -> ReasoningStep {
        ReasoningStep::new(ReasoningStepType::Deductive, content, confidence)
    }

    #[test]
    fn detects_confirmation_bias() {
        let steps = vec![step("a", 0.9), step("b", 0.85), step("c", 0.95)];
        let biases = detect(&steps);
        assert!(biases.iter().any(|b| b.kind == BiasKind::Confirmation));
    }

    #[test]
    fn detects_anchoring() {
        let steps = vec![step("first", 0.9), step("second", 0.4), step("third", 0.5)];
        let biases = detect(&steps);
        assert!(biases.iter().any(|b| b.kind == BiasKind::Anchoring));
    }

    #[test]
    fn detects_availability_from_recency_term() {
        let steps = vec![step("we just saw this happen yesterday", 0.5)];
        let biases = detect(&steps);
        assert!(biases.iter().any(|b| b.kind == BiasKind::Availability));
    }

    #[test]
    fn detects_overconfidence() {
        let steps = vec![step("a", 0.9), step("b", 0.9), step("c", 0.88)];
        let biases = detect(&steps);
        assert!(biases.iter().any(|b| b.kind == BiasKind::Overconfidence));
    }

    #[test]
    fn no_false_positive_on_balanced_transcript() {
        let steps = vec![step("a", 0.5), step("b", 0.55), step("c", 0.6)];
        let biases = detect(&steps);
        assert!(biases.iter().all(|b| b.kind != BiasKind::Confirmation));
        assert!(biases.iter().all(|b| b.kind != BiasKind::Overconfidence));
    }

    #[test]
    fn detectors_can_all_fire_together() {
        let steps = vec![
            step("recent dramatic event confirmed our view", 0.95),
            step("second", 0.9),
            step("third", 0.88),
        ];
        let biases = detect(&steps);
        let kinds: std::collections::HashSet<_> = biases.iter().map(|b| b.kind).collect();
        assert!(kinds.len() >= 2);
    }
}
