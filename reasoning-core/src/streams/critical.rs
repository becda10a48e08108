//! The Critical reasoning stream: assumption surfacing, argument
//! evaluation, bias detection and problem-framing review (`spec.md` §4.6).

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::bias;
use crate::config::CHECKPOINTS;
use crate::error::Result;
use crate::evidence;
use crate::problem::{Context, Problem};
use crate::step::{ReasoningStep, ReasoningStepType};

use super::{Insight, ReasoningStream, SharedState, StreamResult, StreamStatus, StreamStatusSnapshot, StreamType};

/// One assumption surfaced from the problem statement, with a confidence
/// that it actually holds.
#[derive(Debug, Clone)]
pub struct Assumption {
    pub statement: String,
    pub confidence: f64,
}

/// A judgment about the strength of a single argument in the transcript.
#[derive(Debug, Clone)]
pub struct ArgumentEvaluation {
    pub claim: String,
    pub strength: f64,
    pub weaknesses: Vec<String>,
}

/// An assessment of whether the problem has been framed in a way that
/// admits the solutions being considered.
#[derive(Debug, Clone)]
pub struct FramingEvaluation {
    pub is_well_framed: bool,
    pub notes: String,
}

pub struct CriticalStream {
    state: SharedState,
}

impl CriticalStream {
    #[must_use]
    pub fn new() -> Self {
        Self { state: SharedState::new(StreamType::Critical) }
    }
}

impl Default for CriticalStream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReasoningStream for CriticalStream {
    fn stream_type(&self) -> StreamType {
        StreamType::Critical
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
        let assumptions = surface_assumptions(problem);

        self.state.set_progress(CHECKPOINTS[1]);
        tokio::task::yield_now().await;
        let arguments = evaluate_arguments(problem, &assumptions);

        self.state.set_progress(CHECKPOINTS[2]);
        tokio::task::yield_now().await;
        let framing = evaluate_framing(problem);

        let mut steps = vec![
            ReasoningStep::new(
                ReasoningStepType::Contextual,
                format!(
                    "Surfaced {} assumption(s): {}",
                    assumptions.len(),
                    assumptions.iter().map(|a| a.statement.as_str()).collect::<Vec<_>>().join("; ")
                ),
                mean(&assumptions.iter().map(|a| a.confidence).collect::<Vec<_>>()),
            ),
            ReasoningStep::new(
                ReasoningStepType::LogicalInference,
                format!("Evaluated {} argument(s) for strength and weaknesses.", arguments.len()),
                mean(&arguments.iter().map(|a| a.strength).collect::<Vec<_>>()),
            ),
        ];

        let probe_steps = vec![ReasoningStep::new(
            ReasoningStepType::Metacognitive,
            format!("Problem framing: {}", framing.notes),
            if framing.is_well_framed { 0.8 } else { 0.4 },
        )];
        let bias_detections = bias::detect(&[steps.clone(), probe_steps.clone()].concat());
        steps.extend(probe_steps);
        steps.push(ReasoningStep::new(
            ReasoningStepType::Metacognitive,
            format!("Detected {} potential bias pattern(s) in the transcript so far.", bias_detections.len()),
            if bias_detections.is_empty() { 0.9 } else { 1.0 - mean(&bias_detections.iter().map(|b| b.severity).collect::<Vec<_>>()) },
        ));

        let transcript: String = steps.iter().map(|s| s.content.clone()).collect::<Vec<_>>().join(" ");
        let extraction = evidence::extract(&transcript);
        let insights: Vec<Insight> = bias_detections
            .iter()
            .map(|b| Insight {
                content: format!("Bias flagged: {:?} — {}", b.kind, b.description),
                importance: b.severity,
                source_stream_id: self.state.stream_id(),
            })
            .chain(extraction.evidence.iter().map(|e| Insight {
                content: format!("Critical evidence: {}", e.content),
                importance: e.confidence,
                source_stream_id: self.state.stream_id(),
            }))
            .collect();
        for insight in &insights {
            self.state.push_insight(insight.clone());
        }

        let sub_assumptions = mean(&assumptions.iter().map(|a| a.confidence).collect::<Vec<_>>());
        let sub_arguments = mean(&arguments.iter().map(|a| a.strength).collect::<Vec<_>>());
        let sub_bias_and_framing = {
            let bias_clarity = 1.0 - mean(&bias_detections.iter().map(|b| b.severity).collect::<Vec<_>>());
            let framing_score = if framing.is_well_framed { 1.0 } else { 0.4 };
            mean(&[bias_clarity, framing_score])
        };
        let confidence = mean(&[sub_assumptions, sub_arguments, sub_bias_and_framing]).clamp(0.0, 1.0);

        let mut conclusions: Vec<String> = arguments
            .iter()
            .filter(|a| a.strength >= 0.6)
            .map(|a| format!("Argument holds: {}", a.claim))
            .collect();
        if conclusions.is_empty() {
            conclusions.push(format!(
                "No argument for {} reaches the strength threshold; treat conclusions as provisional.",
                problem.description
            ));
        }

        self.state.set_progress(1.0);
        self.state.set_active(false, false);

        Ok(StreamResult {
            stream_id: self.state.stream_id(),
            stream_type: StreamType::Critical,
            reasoning_steps: steps,
            conclusions,
            confidence,
            processing_time_ms: started.elapsed().as_millis() as u64,
            insights,
            evidence: problem.evidence.clone(),
            assumptions: assumptions.into_iter().map(|a| a.statement).collect(),
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

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn surface_assumptions(problem: &Problem) -> Vec<Assumption> {
    let mut assumptions = vec![Assumption {
        statement: format!("The stated domain ({}) is the correct frame for this problem.", problem.domain),
        confidence: 0.7,
    }];
    if problem.stakeholders.is_empty() {
        assumptions.push(Assumption {
            statement: "No stakeholders were named, so impact is assumed to be contained.".to_string(),
            confidence: 0.4,
        });
    }
    if problem.evidence.is_empty() {
        assumptions.push(Assumption {
            statement: "Absent supporting evidence, the problem statement is taken at face value.".to_string(),
            confidence: 0.5,
        });
    }
    assumptions
}

fn evaluate_arguments(problem: &Problem, assumptions: &[Assumption]) -> Vec<ArgumentEvaluation> {
    let base_strength = (1.0 - problem.uncertainty() * 0.5).clamp(0.0, 1.0);
    vec![ArgumentEvaluation {
        claim: format!("The proposed reading of {} follows from the stated constraints.", problem.description),
        strength: base_strength,
        weaknesses: assumptions
            .iter()
            .filter(|a| a.confidence < 0.6)
            .map(|a| format!("relies on a low-confidence assumption: {}", a.statement))
            .collect(),
    }]
}

fn evaluate_framing(problem: &Problem) -> FramingEvaluation {
    let is_well_framed = !problem.goals.is_empty() || !problem.constraints.is_empty();
    let notes = if is_well_framed {
        format!("{} is framed with explicit goals or constraints, narrowing the solution space.", problem.description)
    } else {
        format!("{} lacks explicit goals or constraints; the framing may be too open-ended to evaluate solutions against.", problem.description)
    };
    FramingEvaluation { is_well_framed, notes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn surfaces_assumptions_and_detects_bias_when_present() {
        let stream = CriticalStream::new();
        stream.init().await.unwrap();
        let problem = Problem::new("deploy the new pricing model", "finance").unwrap();
        let result = stream.process(&problem, None).await.unwrap();
        assert!(!result.assumptions.is_empty());
        assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
    }
}
