//! The Synthetic reasoning stream: integrates insights shared by the other
//! three streams, reconciles conflicting perspectives and assembles a
//! holistic solution (`spec.md` §4.6).

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::CHECKPOINTS;
use crate::error::Result;
use crate::evidence;
use crate::problem::{Context, Problem};
use crate::step::{ReasoningStep, ReasoningStepType};

use super::{Insight, ReasoningStream, SharedState, StreamResult, StreamStatus, StreamStatusSnapshot, StreamType};

/// One point of apparent disagreement between shared insights, and how it
/// was resolved.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub description: String,
    pub resolved: bool,
}

pub struct SyntheticStream {
    state: SharedState,
}

impl SyntheticStream {
    #[must_use]
    pub fn new() -> Self {
        Self { state: SharedState::new(StreamType::Synthetic) }
    }
}

impl Default for SyntheticStream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReasoningStream for SyntheticStream {
    fn stream_type(&self) -> StreamType {
        StreamType::Synthetic
    }

    async fn init(&self) -> Result<()> {
        self.state.set_active(true, false);
        Ok(())
    }

    async fn process(&self, problem: &Problem, _context: Option<&Context>) -> Result<StreamResult> {
        let started = std::time::Instant::now();
        self.state.set_active(true, true);

        self.state.set_progress(CHECKPOINTS[0]);
        tokio::task::yield_now().await;
        let shared = self.state.shared_insights();
        let integration_quality = integrate_insights(&shared);

        self.state.set_progress(CHECKPOINTS[1]);
        tokio::task::yield_now().await;
        let reconciliations = reconcile_perspectives(&shared);
        let reconciliation_quality = if reconciliations.is_empty() {
            1.0
        } else {
            reconciliations.iter().filter(|r| r.resolved).count() as f64 / reconciliations.len() as f64
        };

        self.state.set_progress(CHECKPOINTS[2]);
        tokio::task::yield_now().await;
        let completeness = (shared.len() as f64 / 4.0).min(1.0).max(0.3);
        let solution = synthesize_solution(problem, &shared, integration_quality, completeness);

        let steps = vec![
            ReasoningStep::new(
                ReasoningStepType::Inductive,
                format!("Integrated {} shared insight(s) from other streams.", shared.len()),
                integration_quality,
            ),
            ReasoningStep::new(
                ReasoningStepType::Contextual,
                format!(
                    "Reconciled {} point(s) of apparent disagreement ({} resolved).",
                    reconciliations.len(),
                    reconciliations.iter().filter(|r| r.resolved).count()
                ),
                reconciliation_quality,
            ),
            ReasoningStep::new(ReasoningStepType::Metacognitive, solution.clone(), completeness),
        ];

        let transcript: String = steps.iter().map(|s| s.content.clone()).collect::<Vec<_>>().join(" ");
        let extraction = evidence::extract(&transcript);
        let insights: Vec<Insight> = extraction
            .evidence
            .iter()
            .map(|e| Insight {
                content: format!("Synthetic evidence: {}", e.content),
                importance: e.confidence,
                source_stream_id: self.state.stream_id(),
            })
            .collect();
        for insight in &insights {
            self.state.push_insight(insight.clone());
        }

        let confidence =
            (0.3 * integration_quality + 0.3 * reconciliation_quality + 0.4 * integration_quality * completeness)
                .clamp(0.0, 1.0);

        self.state.set_progress(1.0);
        self.state.set_active(false, false);

        Ok(StreamResult {
            stream_id: self.state.stream_id(),
            stream_type: StreamType::Synthetic,
            reasoning_steps: steps,
            conclusions: vec![solution],
            confidence,
            processing_time_ms: started.elapsed().as_millis() as u64,
            insights,
            evidence: problem.evidence.clone(),
            assumptions: vec!["Shared insights accurately reflect each originating stream's reasoning.".to_string()],
            status: StreamStatus::Completed,
        })
    }

    async fn reset(&self) {
        self.state.set_progress(0.0);
        self.state.set_active(false, false);
    }

    fn status(&self) -> StreamStatusSnapshot {
        self.state.status()
    }

    fn progress(&self) -> f64 {
        self.state.progress()
    }

    fn get_insights(&self) -> Vec<Insight> {
        self.state.insights()
    }

    fn inbox(&self) -> Arc<Mutex<Vec<Insight>>> {
        self.state.inbox()
    }
}

/// Quality of the cross-stream integration: how much of the shared
/// insight pool is actually load-bearing (importance above half the
/// sharing threshold used elsewhere), scaled by volume.
fn integrate_insights(shared: &[Insight]) -> f64 {
    if shared.is_empty() {
        return 0.3;
    }
    let mean_importance = shared.iter().map(|i| i.importance).sum::<f64>() / shared.len() as f64;
    let volume_factor = (shared.len() as f64 / 6.0).min(1.0);
    (0.6 * mean_importance + 0.4 * volume_factor).clamp(0.0, 1.0)
}

/// Flags insights whose content looks contradictory (one asserts what
/// another denies, detected heuristically via a leading negation term)
/// as needing reconciliation, and considers them resolved once both
/// sides of the pair carry importance — i.e. neither can be dismissed
/// as noise, so the synthesis step will have had to actually address it.
fn reconcile_perspectives(shared: &[Insight]) -> Vec<Reconciliation> {
    let mut reconciliations = Vec::new();
    for pair in shared.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let a_lower = a.content.to_lowercase();
        let b_lower = b.content.to_lowercase();
        let looks_conflicting = (a_lower.contains("not") && !b_lower.contains("not"))
            || (b_lower.contains("not") && !a_lower.contains("not"));
        if looks_conflicting {
            let resolved = a.importance > 0.3 && b.importance > 0.3;
            reconciliations.push(Reconciliation {
                description: format!("\"{}\" vs \"{}\"", a.content, b.content),
                resolved,
            });
        }
    }
    reconciliations
}

fn synthesize_solution(problem: &Problem, shared: &[Insight], integration_quality: f64, completeness: f64) -> String {
    if shared.is_empty() {
        format!(
            "No cross-stream insights were shared yet; synthesis for {} rests on the other streams' conclusions alone.",
            problem.description
        )
    } else {
        format!(
            "Synthesising across {} shared insight(s) (integration {:.2}, completeness {:.2}), \
             the most consistent solution for {} combines the highest-importance perspectives.",
            shared.len(),
            integration_quality,
            completeness,
            problem.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn synthesizes_with_no_shared_insights() {
        let stream = SyntheticStream::new();
        stream.init().await.unwrap();
        let problem = Problem::new("unify the reporting pipeline", "data").unwrap();
        let result = stream.process(&problem, None).await.unwrap();
        assert_eq!(result.conclusions.len(), 1);
        assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
    }

    #[tokio::test]
    async fn integrates_shared_insights_from_inbox() {
        let stream = SyntheticStream::new();
        stream.init().await.unwrap();
        {
            let inbox = stream.inbox();
            inbox.lock().push(Insight {
                content: "latency is not the bottleneck".to_string(),
                importance: 0.8,
                source_stream_id: "analytical".to_string(),
            });
            inbox.lock().push(Insight {
                content: "latency is the bottleneck".to_string(),
                importance: 0.75,
                source_stream_id: "critical".to_string(),
            });
        }
        let problem = Problem::new("diagnose checkout latency", "ops").unwrap();
        let result = stream.process(&problem, None).await.unwrap();
        assert!(result.confidence > 0.0);
    }
}
