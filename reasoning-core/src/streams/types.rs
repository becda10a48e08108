//! Shared data model for the four reasoning streams (`spec.md` §3, §4.6).

use serde::{Deserialize, Serialize};

use crate::problem::Evidence;
use crate::step::ReasoningStep;

/// Which of the four specialised reasoning streams produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    Analytical,
    Creative,
    Critical,
    Synthetic,
}

impl StreamType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StreamType::Analytical => "analytical",
            StreamType::Creative => "creative",
            StreamType::Critical => "critical",
            StreamType::Synthetic => "synthetic",
        }
    }

    /// The four stream types in the coordinator's stable id sequence.
    #[must_use]
    pub fn all() -> [StreamType; 4] {
        [StreamType::Analytical, StreamType::Creative, StreamType::Critical, StreamType::Synthetic]
    }
}

/// Lifecycle status of a single stream's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl StreamStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, StreamStatus::Completed | StreamStatus::Failed | StreamStatus::Cancelled)
    }
}

/// A text insight produced by a stream, shareable once `importance` passes
/// the configured threshold (default 0.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub content: String,
    pub importance: f64,
    pub source_stream_id: String,
}

impl Insight {
    #[must_use]
    pub fn is_shareable(&self, threshold: f64) -> bool {
        self.importance > threshold
    }
}

/// The frozen output of one completed (or partially completed) stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamResult {
    pub stream_id: String,
    pub stream_type: StreamType,
    pub reasoning_steps: Vec<ReasoningStep>,
    pub conclusions: Vec<String>,
    pub confidence: f64,
    pub processing_time_ms: u64,
    pub insights: Vec<Insight>,
    pub evidence: Vec<Evidence>,
    pub assumptions: Vec<String>,
    pub status: StreamStatus,
}

/// A point-in-time snapshot of a stream's liveness, used by the
/// coordinator's checkpoint eligibility checks without needing to await
/// the stream itself.
#[derive(Debug, Clone)]
pub struct StreamStatusSnapshot {
    pub active: bool,
    pub processing: bool,
    pub last_activity: chrono::DateTime<chrono::Utc>,
    pub error: Option<String>,
}
