//! Process-wide configuration for the reasoning engine.
//!
//! Loaded once at startup and handed around as an immutable `Arc`; no
//! call site reaches for a singleton (see `spec.md` §9 "Global mutable
//! state").

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Checkpoint progress boundaries the coordinator synchronises at.
pub const CHECKPOINTS: [f64; 3] = [0.25, 0.50, 0.75];

/// Engine-wide tunables. Two threshold constants are kept distinct even
/// though the reference values coincide (0.7): the open question in
/// `spec.md` §9 explicitly leaves it unstated whether they must track each
/// other, so they are never merged into one constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Importance above which an insight is shared at a checkpoint.
    pub insight_share_threshold: f64,
    /// Diversity below which the coordinator raises a diversity alert.
    pub diversity_alert_threshold: f64,
    /// Mean confidence above which a low-diversity result is "natural".
    pub natural_convergence_confidence: f64,
    /// Polling period while waiting for checkpoint eligibility.
    pub checkpoint_poll_interval: Duration,
    /// Per-checkpoint wait budget before proceeding with whatever streams
    /// are ready.
    pub checkpoint_max_wait: Duration,
    /// Whole-pipeline deadline; on expiry the coordinator composes a
    /// `Degraded` result.
    pub pipeline_timeout: Duration,
    /// Design target for `total_coordination_time / total_processing_time`;
    /// advisory only, logged when exceeded.
    pub overhead_target: f64,
    /// Minimum number of hypotheses the insight generator tries to surface
    /// once at least one pattern has matched.
    pub min_hypotheses_on_match: usize,
    /// Confidence floor below which a pattern match result is discarded by
    /// the insight generator (applied *after* each pattern's own
    /// `quality_threshold`).
    pub min_insight_confidence: f64,
    /// Whether the fallback pair is emitted when zero patterns match.
    pub fallback_enabled: bool,
    /// Confidence dimension weights; must sum to 1.0.
    pub confidence_weights: ConfidenceWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            insight_share_threshold: 0.7,
            diversity_alert_threshold: 0.7,
            natural_convergence_confidence: 0.9,
            checkpoint_poll_interval: Duration::from_millis(10),
            checkpoint_max_wait: Duration::from_millis(500),
            pipeline_timeout: Duration::from_secs(60),
            overhead_target: 0.10,
            min_hypotheses_on_match: 2,
            min_insight_confidence: 0.1,
            fallback_enabled: true,
            confidence_weights: ConfidenceWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML configuration document, rejecting weight tables that
    /// do not sum to 1.0 (`InternalInvariantError` territory if smuggled
    /// past this point).
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| Error::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.confidence_weights.validate()
    }
}

/// Weights for the four confidence dimensions (§4.3). Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub evidence: f64,
    pub coherence: f64,
    pub completeness: f64,
    pub uncertainty: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            evidence: 0.30,
            coherence: 0.30,
            completeness: 0.25,
            uncertainty: 0.15,
        }
    }
}

impl ConfidenceWeights {
    fn validate(&self) -> Result<()> {
        let sum = self.evidence + self.coherence + self.completeness + self.uncertainty;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(Error::InternalInvariant(format!(
                "confidence weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

/// Calibration applied to a domain's raw confidence score:
/// `final = clamp(slope * raw + intercept)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalibrationModel {
    pub slope: f64,
    pub intercept: f64,
}

impl CalibrationModel {
    #[must_use]
    pub fn apply(&self, raw: f64) -> f64 {
        (self.slope * raw + self.intercept).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_unbalanced_weights() {
        let bad = ConfidenceWeights {
            evidence: 0.5,
            coherence: 0.5,
            completeness: 0.5,
            uncertainty: 0.5,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn calibration_clamps_output() {
        let cal = CalibrationModel {
            slope: 2.0,
            intercept: 0.5,
        };
        assert_eq!(cal.apply(1.0), 1.0);
        assert_eq!(cal.apply(-1.0), 0.0);
    }
}
