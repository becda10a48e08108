//! `ReasoningStep` — the atomic unit a stream's transcript is built from
//! (`spec.md` §3). Shared by the bias detector, the confidence assessor and
//! all four reasoning streams.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The kind of inferential move a step represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningStepType {
    LogicalInference,
    Deductive,
    Inductive,
    Analogical,
    Heuristic,
    Contextual,
    Metacognitive,
}

/// A single step in a stream's reasoning transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    #[serde(rename = "type")]
    pub kind: ReasoningStepType,
    pub content: String,
    confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl ReasoningStep {
    /// Constructs a step, clamping confidence into `[0,1]`.
    #[must_use]
    pub fn new(kind: ReasoningStepType, content: impl Into<String>, confidence: f64) -> Self {
        Self {
            kind,
            content: content.into(),
            confidence: confidence.clamp(0.0, 1.0),
            metadata: None,
        }
    }

    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
