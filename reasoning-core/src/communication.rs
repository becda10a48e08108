//! C9 — Communication Layer.
//!
//! Pure formatting over a completed `ConfidenceAssessment`: no I/O, no
//! mutation, just text a client can render directly (`spec.md` §4.9).

use crate::confidence::{ConfidenceAssessment, UncertaintyType};
use crate::error::{Error, Result};
use crate::insight::InsightRecommendation;

/// Validates a raw confidence score before formatting it.
fn validate_confidence(confidence: f64) -> Result<()> {
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(Error::Validation(format!("confidence must be a finite number in [0,1], got {confidence}")));
    }
    Ok(())
}

/// `"73% (Moderately Confident)"` — a canonical percentage-and-label
/// rendering of a confidence score.
pub fn percentage_and_label(confidence: f64) -> Result<String> {
    validate_confidence(confidence)?;
    let percentage = (confidence * 100.0).round() as i64;
    Ok(format!("{percentage}% ({})", band_label(confidence)))
}

/// Which of five confidence bands a score falls into.
fn band_label(confidence: f64) -> &'static str {
    match confidence {
        c if c >= 0.9 => "Very High Confidence",
        c if c >= 0.7 => "High Confidence",
        c if c >= 0.5 => "Moderately Confident",
        c if c >= 0.3 => "Low Confidence",
        _ => "Very Low Confidence",
    }
}

/// A longer, banded interpretation sentence for the same score.
pub fn interpretation(confidence: f64) -> Result<String> {
    validate_confidence(confidence)?;
    let sentence = match confidence {
        c if c >= 0.9 => "The assessment is well-supported and suitable to act on directly.",
        c if c >= 0.7 => "The assessment is reasonably well-supported; a light review before acting is sensible.",
        c if c >= 0.5 => "The assessment is plausible but rests on incomplete support; verify before relying on it.",
        c if c >= 0.3 => "The assessment carries meaningful uncertainty; treat it as a starting hypothesis only.",
        _ => "The assessment is weakly supported; gather more evidence before acting on it.",
    };
    Ok(sentence.to_string())
}

/// One of three fixed passages explaining the assessment's uncertainty
/// type, independent of its numeric level.
#[must_use]
pub fn uncertainty_explanation(uncertainty_type: UncertaintyType) -> &'static str {
    match uncertainty_type {
        UncertaintyType::Epistemic => {
            "This uncertainty stems from incomplete knowledge: more evidence or investigation \
             could meaningfully reduce it."
        }
        UncertaintyType::Aleatory => {
            "This uncertainty is inherent to the situation itself: it reflects genuine \
             variability that further investigation is unlikely to remove."
        }
        UncertaintyType::Ambiguity => {
            "This uncertainty comes from the problem statement admitting more than one \
             reasonable interpretation: clarifying intent would reduce it more than gathering data."
        }
    }
}

/// Renders a full confidence assessment as client-facing text: the
/// percentage-and-label line, the interpretation, and the uncertainty
/// explanation.
pub fn describe_assessment(assessment: &ConfidenceAssessment) -> Result<String> {
    let headline = percentage_and_label(assessment.overall)?;
    let interpretation = interpretation(assessment.overall)?;
    let uncertainty = uncertainty_explanation(assessment.uncertainty_type);
    Ok(format!("{headline}. {interpretation} {uncertainty}"))
}

/// Orders recommendations for display: highest priority first, ties
/// broken by the order they were supplied in (stable sort).
#[must_use]
pub fn prioritise_recommendations(recommendations: &[InsightRecommendation]) -> Vec<&InsightRecommendation> {
    let mut ordered: Vec<&InsightRecommendation> = recommendations.iter().collect();
    ordered.sort_by(|a, b| b.recommendation.priority.cmp(&a.recommendation.priority));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_finite_confidence() {
        assert!(percentage_and_label(f64::NAN).is_err());
        assert!(percentage_and_label(1.5).is_err());
        assert!(percentage_and_label(-0.1).is_err());
    }

    #[test]
    fn bands_boundary_scores_correctly() {
        assert!(percentage_and_label(0.9).unwrap().contains("Very High"));
        assert!(percentage_and_label(0.7).unwrap().contains("High Confidence"));
        assert!(percentage_and_label(0.2).unwrap().contains("Very Low"));
    }

    #[test]
    fn uncertainty_explanations_are_distinct() {
        let e = uncertainty_explanation(UncertaintyType::Epistemic);
        let a = uncertainty_explanation(UncertaintyType::Aleatory);
        let m = uncertainty_explanation(UncertaintyType::Ambiguity);
        assert_ne!(e, a);
        assert_ne!(a, m);
        assert_ne!(e, m);
    }
}
