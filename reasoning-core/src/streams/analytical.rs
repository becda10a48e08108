//! The Analytical reasoning stream: logical inference, evidence weighing
//! and a linear argument chain (`spec.md` §4.6).

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Duration;

use crate::config::CHECKPOINTS;
use crate::error::Result;
use crate::evidence;
use crate::problem::{Context, Problem};
use crate::step::{ReasoningStep, ReasoningStepType};

use super::{Insight, ReasoningStream, SharedState, StreamResult, StreamStatus, StreamStatusSnapshot, StreamType};

/// A chain of premises leading to conclusions, with an explicit validity
/// and soundness read-out.
#[derive(Debug, Clone)]
pub struct LogicalAnalysis {
    pub premises: Vec<String>,
    pub inferences: Vec<String>,
    pub conclusions: Vec<String>,
    pub logical_validity: f64,
    pub soundness_assessment: String,
}

pub struct AnalyticalStream {
    state: SharedState,
}

impl AnalyticalStream {
    #[must_use]
    pub fn new() -> Self {
        Self { state: SharedState::new(StreamType::Analytical) }
    }
}

impl Default for AnalyticalStream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReasoningStream for AnalyticalStream {
    fn stream_type(&self) -> StreamType {
        StreamType::Analytical
    }

    async fn init(&self) -> Result<()> {
        self.state.set_active(true, false);
        Ok(())
    }

    async fn process(&self, problem: &Problem, _context: Option<&Context>) -> Result<StreamResult> {
        let started = std::time::Instant::now();
        self.state.set_active(true, true);

        let premises: Vec<String> = problem
            .constraints
            .iter()
            .cloned()
            .chain(std::iter::once(format!("problem domain: {}", problem.domain)))
            .collect();

        self.state.set_progress(CHECKPOINTS[0]);
        tokio::task::yield_now().await;

        let logical_analysis = build_logical_analysis(problem, &premises);
        let mut steps = vec![
            ReasoningStep::new(
                ReasoningStepType::Deductive,
                format!("Given premises [{}], derive constraints on the solution space.", premises.join("; ")),
                logical_analysis.logical_validity,
            ),
        ];

        self.state.set_progress(CHECKPOINTS[1]);
        tokio::time::sleep(Duration::from_millis(1)).await;

        let evidence_eval = evaluate_evidence(problem);
        steps.push(ReasoningStep::new(
            ReasoningStepType::LogicalInference,
            format!(
                "Evidence review: {} item(s), mean reliability {:.2}, mean relevance {:.2}.",
                problem.evidence.len(),
                evidence_eval.0,
                evidence_eval.1
            ),
            evidence_eval.0,
        ));

        self.state.set_progress(CHECKPOINTS[2]);
        tokio::task::yield_now().await;

        let argument_chain_strength = (steps.len() as f64 / 4.0).min(1.0);
        steps.push(ReasoningStep::new(
            ReasoningStepType::Metacognitive,
            format!(
                "Argument chain assembled from {} linked step(s); soundness: {}",
                steps.len() + 1,
                logical_analysis.soundness_assessment
            ),
            argument_chain_strength,
        ));

        let transcript: String = steps.iter().map(|s| s.content.clone()).collect::<Vec<_>>().join(" ");
        let extraction = evidence::extract(&transcript);
        let insights: Vec<Insight> = extraction
            .evidence
            .iter()
            .map(|e| Insight {
                content: format!("Analytical evidence: {}", e.content),
                importance: e.confidence,
                source_stream_id: self.state.stream_id(),
            })
            .collect();
        for insight in &insights {
            self.state.push_insight(insight.clone());
        }

        let confidence =
            (0.4 * logical_analysis.logical_validity + 0.4 * evidence_eval.0.max(evidence_eval.1) + 0.2 * argument_chain_strength)
                .clamp(0.0, 1.0);

        self.state.set_progress(1.0);
        self.state.set_active(false, false);

        Ok(StreamResult {
            stream_id: self.state.stream_id(),
            stream_type: StreamType::Analytical,
            reasoning_steps: steps,
            conclusions: logical_analysis.conclusions,
            confidence,
            processing_time_ms: started.elapsed().as_millis() as u64,
            insights,
            evidence: problem.evidence.clone(),
            assumptions: vec!["Premises are independently verifiable.".to_string()],
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

fn build_logical_analysis(problem: &Problem, premises: &[String]) -> LogicalAnalysis {
    let logical_validity = (1.0 - problem.complexity() * 0.3).clamp(0.0, 1.0);
    let soundness_assessment = if logical_validity > 0.7 {
        "premises support the conclusion with low residual risk".to_string()
    } else {
        "premises leave meaningful residual uncertainty".to_string()
    };
    LogicalAnalysis {
        premises: premises.to_vec(),
        inferences: vec![format!("{} constrains the viable solution space", problem.domain)],
        conclusions: vec![format!("Given the stated constraints, {} is the most consistent reading of the evidence.", problem.description)],
        logical_validity,
        soundness_assessment,
    }
}

fn evaluate_evidence(problem: &Problem) -> (f64, f64) {
    if problem.evidence.is_empty() {
        return (0.5, 0.5);
    }
    let reliability = problem.evidence.iter().map(|e| e.reliability()).sum::<f64>() / problem.evidence.len() as f64;
    let relevance = problem.evidence.iter().map(|e| e.relevance()).sum::<f64>() / problem.evidence.len() as f64;
    (reliability, relevance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn process_completes_with_monotone_progress() {
        let stream = AnalyticalStream::new();
        stream.init().await.unwrap();
        let problem = Problem::new("optimise the checkout pipeline", "ops").unwrap();
        let result = stream.process(&problem, None).await.unwrap();
        assert_eq!(result.status, StreamStatus::Completed);
        assert_eq!(stream.progress(), 1.0);
        assert!(!result.conclusions.is_empty());
    }
}
