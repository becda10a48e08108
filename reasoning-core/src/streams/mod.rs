//! C6 — Reasoning Streams.
//!
//! Four polymorphic variants sharing one capability set (`spec.md` §4.6,
//! §9 "Polymorphism across streams"). Modelled as a trait over `&self`
//! with interior mutability rather than inheritance, so a
//! `Arc<dyn ReasoningStream>` can be cloned cheaply: the coordinator spawns
//! `process` in its own task while continuing to call `progress`/`status`/
//! `get_insights` on the same handle from its polling loop.

pub mod analytical;
pub mod creative;
pub mod critical;
pub mod synthetic;
pub mod types;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

pub use types::{Insight, StreamResult, StreamStatus, StreamStatusSnapshot, StreamType};

use crate::error::Result;
use crate::problem::{Context, Problem};

/// The capability set every reasoning stream implements.
#[async_trait]
pub trait ReasoningStream: Send + Sync {
    /// Which stream variant this is.
    fn stream_type(&self) -> StreamType;

    /// Idempotent initialisation; safe to call more than once.
    async fn init(&self) -> Result<()>;

    /// Runs the stream to completion against `problem`, producing a frozen
    /// `StreamResult`. May read (but never mutate) the shared inbox the
    /// coordinator delivers insights to.
    async fn process(&self, problem: &Problem, context: Option<&Context>) -> Result<StreamResult>;

    /// Discards in-flight state; status becomes non-processing afterwards.
    async fn reset(&self);

    /// A point-in-time liveness snapshot.
    fn status(&self) -> StreamStatusSnapshot;

    /// Monotone non-decreasing progress in `[0,1]`.
    fn progress(&self) -> f64;

    /// Insights accumulated so far, surfaced as soon as they are produced
    /// (not only at the end of `process`).
    fn get_insights(&self) -> Vec<Insight>;

    /// The stream's shared inbox. Only the coordinator writes to it; the
    /// stream only reads.
    fn inbox(&self) -> Arc<Mutex<Vec<Insight>>>;
}

/// Progress and bookkeeping state shared between a stream's public handle
/// and whatever task is actually running `process`.
pub(crate) struct SharedState {
    stream_type: StreamType,
    progress_micros: AtomicU64,
    insights: Mutex<Vec<Insight>>,
    inbox: Arc<Mutex<Vec<Insight>>>,
    status: Mutex<StreamStatusSnapshot>,
}

impl SharedState {
    pub(crate) fn new(stream_type: StreamType) -> Self {
        Self {
            stream_type,
            progress_micros: AtomicU64::new(0),
            insights: Mutex::new(Vec::new()),
            inbox: Arc::new(Mutex::new(Vec::new())),
            status: Mutex::new(StreamStatusSnapshot {
                active: false,
                processing: false,
                last_activity: chrono::Utc::now(),
                error: None,
            }),
        }
    }

    pub(crate) fn stream_id(&self) -> String {
        self.stream_type.as_str().to_string()
    }

    /// Sets progress, clamped to `[0,1]` and never allowed to move
    /// backwards (monotone non-decreasing per `spec.md` §4.6).
    pub(crate) fn set_progress(&self, value: f64) {
        let clamped = value.clamp(0.0, 1.0);
        let micros = (clamped * 1_000_000.0) as u64;
        self.progress_micros.fetch_max(micros, Ordering::SeqCst);
        self.touch();
    }

    pub(crate) fn progress(&self) -> f64 {
        self.progress_micros.load(Ordering::SeqCst) as f64 / 1_000_000.0
    }

    pub(crate) fn push_insight(&self, insight: Insight) {
        self.insights.lock().push(insight);
        self.touch();
    }

    pub(crate) fn insights(&self) -> Vec<Insight> {
        self.insights.lock().clone()
    }

    pub(crate) fn inbox(&self) -> Arc<Mutex<Vec<Insight>>> {
        Arc::clone(&self.inbox)
    }

    pub(crate) fn shared_insights(&self) -> Vec<Insight> {
        self.inbox.lock().clone()
    }

    pub(crate) fn set_active(&self, active: bool, processing: bool) {
        let mut status = self.status.lock();
        status.active = active;
        status.processing = processing;
        status.last_activity = chrono::Utc::now();
    }

    pub(crate) fn set_error(&self, error: String) {
        let mut status = self.status.lock();
        status.error = Some(error);
        status.processing = false;
        status.last_activity = chrono::Utc::now();
    }

    pub(crate) fn status(&self) -> StreamStatusSnapshot {
        self.status.lock().clone()
    }

    fn touch(&self) {
        self.status.lock().last_activity = chrono::Utc::now();
    }
}

/// Builds one handle per stream type, in the coordinator's stable id
/// sequence.
#[must_use]
pub fn default_streams() -> Vec<Arc<dyn ReasoningStream>> {
    vec![
        Arc::new(analytical::AnalyticalStream::new()),
        Arc::new(creative::CreativeStream::new()),
        Arc::new(critical::CriticalStream::new()),
        Arc::new(synthetic::SyntheticStream::new()),
    ]
}
