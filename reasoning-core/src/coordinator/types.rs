//! Coordinator-facing result types (`spec.md` §4.7, §6).

use serde::{Deserialize, Serialize};

use crate::streams::StreamResult;

/// Terminal status of a `think_parallel` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorStatus {
    Ok,
    Degraded,
    Cancelled,
}

/// Diversity read-out over the composed stream conclusions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiversityReport {
    pub diversity: f64,
    pub alert: bool,
    pub natural_convergence: bool,
}

/// The full output of a parallel reasoning run (`think_parallel`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkParallelResponse {
    pub stream_results: Vec<StreamResult>,
    pub synthesis: Option<String>,
    pub diversity: DiversityReport,
    pub overhead_percentage: f64,
    pub status: CoordinatorStatus,
}

/// A cooperative cancellation flag observed at suspension points. Plain
/// `Arc<AtomicBool>` rather than a dedicated token type, per `spec.md` §9's
/// fallback guidance for runtimes without a built-in cancellation token.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(std::sync::Arc<std::sync::atomic::AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}
