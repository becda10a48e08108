//! The Creative reasoning stream: alternative generation, unconventional
//! exploration and novel-solution synthesis (`spec.md` §4.6).

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::CHECKPOINTS;
use crate::error::Result;
use crate::evidence;
use crate::problem::{Context, Problem};
use crate::step::{ReasoningStep, ReasoningStepType};

use super::{Insight, ReasoningStream, SharedState, StreamResult, StreamStatus, StreamStatusSnapshot, StreamType};

/// One alternative approach, scored on how doable it is and how much it
/// would move the needle if it worked.
#[derive(Debug, Clone)]
pub struct Alternative {
    pub description: String,
    pub feasibility: f64,
    pub impact: f64,
}

/// An approach deliberately outside the obvious solution space.
#[derive(Debug, Clone)]
pub struct UnconventionalApproach {
    pub description: String,
    pub novelty: f64,
}

/// A synthesised solution blending multiple alternatives.
#[derive(Debug, Clone)]
pub struct NovelSolution {
    pub description: String,
    pub innovation: f64,
    pub implementation_complexity: f64,
}

pub struct CreativeStream {
    state: SharedState,
}

impl CreativeStream {
    #[must_use]
    pub fn new() -> Self {
        Self { state: SharedState::new(StreamType::Creative) }
    }
}

impl Default for CreativeStream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReasoningStream for CreativeStream {
    fn stream_type(&self) -> StreamType {
        StreamType::Creative
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
        let alternatives = generate_alternatives(problem);

        self.state.set_progress(CHECKPOINTS[1]);
        tokio::task::yield_now().await;
        let unconventional = explore_unconventional(problem);

        self.state.set_progress(CHECKPOINTS[2]);
        tokio::task::yield_now().await;
        let novel_solutions = synthesize_novel_solutions(problem, &alternatives, &unconventional);

        let steps = vec![
            ReasoningStep::new(
                ReasoningStepType::Analogical,
                format!("Generated {} alternative approach(es) to {}.", alternatives.len(), problem.description),
                mean(&alternatives.iter().map(|a| a.feasibility).collect::<Vec<_>>()),
            ),
            ReasoningStep::new(
                ReasoningStepType::Heuristic,
                format!("Explored {} unconventional approach(es).", unconventional.len()),
                mean(&unconventional.iter().map(|a| a.novelty).collect::<Vec<_>>()),
            ),
            ReasoningStep::new(
                ReasoningStepType::Inductive,
                format!("Synthesised {} novel solution(s) from the above.", novel_solutions.len()),
                mean(&novel_solutions.iter().map(|s| s.innovation).collect::<Vec<_>>()),
            ),
        ];

        let transcript: String = steps.iter().map(|s| s.content.clone()).collect::<Vec<_>>().join(" ");
        let extraction = evidence::extract(&transcript);
        let insights: Vec<Insight> = novel_solutions
            .iter()
            .map(|solution| Insight {
                content: format!("Novel solution: {}", solution.description),
                importance: solution.innovation,
                source_stream_id: self.state.stream_id(),
            })
            .chain(extraction.evidence.iter().map(|e| Insight {
                content: format!("Creative evidence: {}", e.content),
                importance: e.confidence * 0.5,
                source_stream_id: self.state.stream_id(),
            }))
            .collect();
        for insight in &insights {
            self.state.push_insight(insight.clone());
        }

        let sub_feasibility_impact = mean(&alternatives.iter().map(|a| a.feasibility * a.impact).collect::<Vec<_>>());
        let sub_unconventional = if unconventional.is_empty() { 0.0 } else { 1.0 };
        let mean_innovation = mean(&novel_solutions.iter().map(|s| s.innovation).collect::<Vec<_>>());
        let mean_inverse_complexity =
            mean(&novel_solutions.iter().map(|s| 1.0 - s.implementation_complexity).collect::<Vec<_>>());
        let sub_synthesis = mean_innovation * mean_inverse_complexity;

        let confidence = mean(&[sub_feasibility_impact, sub_unconventional, sub_synthesis]);

        let conclusions: Vec<String> = novel_solutions.iter().map(|s| s.description.clone()).collect();

        self.state.set_progress(1.0);
        self.state.set_active(false, false);

        Ok(StreamResult {
            stream_id: self.state.stream_id(),
            stream_type: StreamType::Creative,
            reasoning_steps: steps,
            conclusions,
            confidence: confidence.clamp(0.0, 1.0),
            processing_time_ms: started.elapsed().as_millis() as u64,
            insights,
            evidence: problem.evidence.clone(),
            assumptions: vec!["Unconventional approaches remain within stated constraints.".to_string()],
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

fn generate_alternatives(problem: &Problem) -> Vec<Alternative> {
    let base_feasibility = 1.0 - problem.complexity() * 0.2;
    vec![
        Alternative {
            description: format!("Re-architect the approach to {} around a simpler contract.", problem.description),
            feasibility: base_feasibility.clamp(0.0, 1.0),
            impact: 0.7,
        },
        Alternative {
            description: format!("Introduce a staged rollout for {}.", problem.description),
            feasibility: (base_feasibility - 0.1).clamp(0.0, 1.0),
            impact: 0.6,
        },
        Alternative {
            description: format!("Delegate part of {} to an existing well-tested component.", problem.description),
            feasibility: (base_feasibility + 0.05).clamp(0.0, 1.0),
            impact: 0.5,
        },
    ]
}

fn explore_unconventional(problem: &Problem) -> Vec<UnconventionalApproach> {
    vec![UnconventionalApproach {
        description: format!("Invert the usual assumption about {} and solve the dual problem.", problem.domain),
        novelty: 0.8,
    }]
}

fn synthesize_novel_solutions(
    problem: &Problem,
    alternatives: &[Alternative],
    unconventional: &[UnconventionalApproach],
) -> Vec<NovelSolution> {
    let innovation = mean(&unconventional.iter().map(|u| u.novelty).collect::<Vec<_>>()).max(0.5);
    let complexity = (problem.complexity() * 0.6).clamp(0.0, 1.0);
    vec![NovelSolution {
        description: format!(
            "Combine {} top alternative(s) with the unconventional reframing for {}.",
            alternatives.len().min(2),
            problem.description
        ),
        innovation,
        implementation_complexity: complexity,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn produces_novel_solutions_and_confidence_in_range() {
        let stream = CreativeStream::new();
        stream.init().await.unwrap();
        let problem = Problem::new("reduce onboarding drop-off", "growth").unwrap();
        let result = stream.process(&problem, None).await.unwrap();
        assert!(!result.conclusions.is_empty());
        assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
    }
}
