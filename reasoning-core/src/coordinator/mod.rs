//! C7 — Stream Coordinator.
//!
//! Dispatches the four reasoning streams concurrently, synchronises them
//! at three checkpoints, shares high-importance insights between rounds,
//! monitors conclusion diversity, and composes the final response —
//! tolerating at most one stream failure before degrading (`spec.md`
//! §4.7, explicitly flagged as the hardest single piece of this system).

pub mod diversity;
pub mod types;

use std::sync::Arc;
use std::time::{Duration, Instant};

pub use types::{CancelFlag, CoordinatorStatus, DiversityReport, ThinkParallelResponse};

use crate::config::{EngineConfig, CHECKPOINTS};
use crate::problem::{Context, Problem};
use crate::streams::{Insight, ReasoningStream, StreamResult, StreamStatus, StreamType};

/// Runs all four streams against `problem`/`context` to completion (or
/// timeout, or cancellation), composing a single `ThinkParallelResponse`.
pub async fn run(
    streams: Vec<Arc<dyn ReasoningStream>>,
    problem: &Problem,
    context: Option<&Context>,
    config: &EngineConfig,
    cancel: CancelFlag,
) -> ThinkParallelResponse {
    let started = Instant::now();
    let owned_problem = problem.clone();
    let owned_context = context.cloned();

    for stream in &streams {
        let _ = stream.init().await;
    }

    let mut handles = Vec::with_capacity(streams.len());
    for stream in &streams {
        let stream = Arc::clone(stream);
        let problem = owned_problem.clone();
        let context = owned_context.clone();
        handles.push(tokio::spawn(async move { stream.process(&problem, context.as_ref()).await }));
    }

    let mut total_coordination_time = Duration::ZERO;
    let mut cancelled = false;

    for &checkpoint in &CHECKPOINTS {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        let sync_started = Instant::now();
        wait_for_checkpoint(&streams, checkpoint, config.checkpoint_poll_interval, config.checkpoint_max_wait, &cancel).await;
        total_coordination_time += sync_started.elapsed();

        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        let share_started = Instant::now();
        share_insights(&streams, config.insight_share_threshold);
        total_coordination_time += share_started.elapsed();
    }

    let remaining_timeout = config.pipeline_timeout.saturating_sub(started.elapsed());
    let mut results = Vec::with_capacity(handles.len());
    for (stream, handle) in streams.iter().zip(handles.into_iter()) {
        if cancelled {
            handle.abort();
            results.push(cancelled_result(stream.stream_type()));
            continue;
        }
        match tokio::time::timeout(remaining_timeout, handle).await {
            Ok(Ok(Ok(result))) => results.push(result),
            Ok(Ok(Err(_engine_error))) => results.push(failed_result(stream.stream_type())),
            Ok(Err(_join_error)) => results.push(failed_result(stream.stream_type())),
            Err(_elapsed) => results.push(failed_result(stream.stream_type())),
        }
    }

    let total_processing_time = started.elapsed();
    compose(results, total_coordination_time, total_processing_time, config, cancelled)
}

async fn wait_for_checkpoint(
    streams: &[Arc<dyn ReasoningStream>],
    checkpoint: f64,
    poll_interval: Duration,
    max_wait: Duration,
    cancel: &CancelFlag,
) {
    let deadline = Instant::now() + max_wait;
    loop {
        if cancel.is_cancelled() {
            return;
        }
        let eligible = streams
            .iter()
            .filter(|s| s.status().processing || s.status().active)
            .all(|s| s.progress() >= checkpoint || s.status().error.is_some());
        if eligible || Instant::now() >= deadline {
            return;
        }
        tokio::time::sleep(poll_interval.min(deadline.saturating_duration_since(Instant::now()).max(Duration::from_millis(1)))).await;
    }
}

/// Collects every insight with `importance > threshold` currently held by
/// any stream and overwrites each stream's inbox with exactly that set —
/// the inbox reflects what was shared *at this checkpoint*, not an
/// ever-growing accumulation of every prior round.
fn share_insights(streams: &[Arc<dyn ReasoningStream>], threshold: f64) {
    let shareable: Vec<Insight> = streams
        .iter()
        .flat_map(|s| s.get_insights())
        .filter(|i| i.is_shareable(threshold))
        .collect();
    for stream in streams {
        let inbox = stream.inbox();
        let mut guard = inbox.lock();
        guard.clear();
        guard.extend(shareable.iter().cloned());
    }
}

fn failed_result(stream_type: StreamType) -> StreamResult {
    StreamResult {
        stream_id: stream_type.as_str().to_string(),
        stream_type,
        reasoning_steps: vec![],
        conclusions: vec![],
        confidence: 0.0,
        processing_time_ms: 0,
        insights: vec![],
        evidence: vec![],
        assumptions: vec![],
        status: StreamStatus::Failed,
    }
}

fn cancelled_result(stream_type: StreamType) -> StreamResult {
    StreamResult {
        stream_id: stream_type.as_str().to_string(),
        stream_type,
        reasoning_steps: vec![],
        conclusions: vec![],
        confidence: 0.0,
        processing_time_ms: 0,
        insights: vec![],
        evidence: vec![],
        assumptions: vec![],
        status: StreamStatus::Cancelled,
    }
}

/// Composes the final response: at most one non-`Completed` stream keeps
/// the run `Ok`, otherwise it degrades; cancellation takes precedence
/// over both.
fn compose(
    results: Vec<StreamResult>,
    total_coordination_time: Duration,
    total_processing_time: Duration,
    config: &EngineConfig,
    cancelled: bool,
) -> ThinkParallelResponse {
    let unhealthy = results.iter().filter(|r| r.status != StreamStatus::Completed).count();
    let is_failure_isolated = unhealthy <= 1;

    let completed: Vec<StreamResult> = results.iter().filter(|r| r.status == StreamStatus::Completed).cloned().collect();
    let diversity_report = diversity::assess(&completed, config);

    let overhead_percentage = if total_processing_time.as_secs_f64() > 0.0 {
        total_coordination_time.as_secs_f64() / total_processing_time.as_secs_f64()
    } else {
        0.0
    };
    if overhead_percentage > config.overhead_target {
        tracing::warn!(overhead_percentage, target = config.overhead_target, "coordination overhead exceeded target");
    }

    let synthesis = completed
        .iter()
        .find(|r| r.stream_type == StreamType::Synthetic)
        .and_then(|r| r.conclusions.first().cloned());

    let status = if cancelled {
        CoordinatorStatus::Cancelled
    } else if is_failure_isolated {
        CoordinatorStatus::Ok
    } else {
        CoordinatorStatus::Degraded
    };

    ThinkParallelResponse {
        stream_results: results,
        synthesis,
        diversity: diversity_report,
        overhead_percentage,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streams::default_streams;

    #[tokio::test]
    async fn runs_all_streams_to_completion() {
        let config = EngineConfig::default();
        let problem = Problem::new("improve checkout conversion", "growth").unwrap();
        let response = run(default_streams(), &problem, None, &config, CancelFlag::new()).await;
        assert_eq!(response.status, CoordinatorStatus::Ok);
        assert_eq!(response.stream_results.len(), 4);
        assert!(response.stream_results.iter().all(|r| r.status == StreamStatus::Completed));
        assert!(response.diversity.diversity >= 0.0 && response.diversity.diversity <= 1.0);
        assert!(response.overhead_percentage >= 0.0);
    }

    #[tokio::test]
    async fn pre_cancelled_run_reports_cancelled() {
        let config = EngineConfig::default();
        let problem = Problem::new("improve checkout conversion", "growth").unwrap();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let response = run(default_streams(), &problem, None, &config, cancel).await;
        assert_eq!(response.status, CoordinatorStatus::Cancelled);
    }

    fn completed_result(stream_type: StreamType, conclusion: &str) -> StreamResult {
        StreamResult {
            stream_id: stream_type.as_str().to_string(),
            stream_type,
            reasoning_steps: vec![],
            conclusions: vec![conclusion.to_string()],
            confidence: 0.6,
            processing_time_ms: 1,
            insights: vec![],
            evidence: vec![],
            assumptions: vec![],
            status: StreamStatus::Completed,
        }
    }

    /// Seed scenario: Critical fails before its first checkpoint, the other
    /// three streams complete. A single failure is isolated, so the run
    /// stays `Ok` and composes the three surviving results (`spec.md` §8
    /// scenario 5).
    #[test]
    fn one_stream_failure_is_isolated_and_stays_ok() {
        let config = EngineConfig::default();
        let results = vec![
            completed_result(StreamType::Analytical, "the system is overloaded"),
            completed_result(StreamType::Creative, "try a cache layer"),
            failed_result(StreamType::Critical),
            completed_result(StreamType::Synthetic, "a combined remediation plan"),
        ];
        let response = compose(results, Duration::from_millis(5), Duration::from_millis(100), &config, false);
        assert_eq!(response.status, CoordinatorStatus::Ok);
        assert_eq!(response.stream_results.len(), 4);
        assert!(response.overhead_percentage >= 0.0);
        assert!(response.diversity.diversity >= 0.0 && response.diversity.diversity <= 1.0);
    }

    /// Two or more failures exceed the isolation budget: the composed
    /// result degrades rather than being reported as fully healthy.
    #[test]
    fn two_stream_failures_exceed_isolation_and_degrade() {
        let config = EngineConfig::default();
        let results = vec![
            completed_result(StreamType::Analytical, "the system is overloaded"),
            failed_result(StreamType::Creative),
            failed_result(StreamType::Critical),
            completed_result(StreamType::Synthetic, "a combined remediation plan"),
        ];
        let response = compose(results, Duration::from_millis(5), Duration::from_millis(100), &config, false);
        assert_eq!(response.status, CoordinatorStatus::Degraded);
    }
}
