//! Data model for the pattern catalogue (`spec.md` §3, §4.4).

use serde::{Deserialize, Serialize};

/// Severity band a pattern is catalogued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// How an indicator's `value` is matched against problem text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorType {
    Exact,
    Fuzzy,
    Regex,
}

/// A single signal a pattern looks for in problem text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    #[serde(rename = "type")]
    pub kind: IndicatorType,
    pub value: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_term_category: Option<KeyTermCategory>,
}

/// Which key-term bag an indicator's weight multiplier is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyTermCategory {
    PrimarySubject,
    DomainTerms,
    ActionVerbs,
    NounPhrases,
    Terms,
}

/// One candidate root-cause hypothesis a pattern offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypothesis {
    pub id: String,
    pub statement: String,
    pub investigation_steps: Vec<String>,
    pub expected_findings: Vec<String>,
    #[serde(default)]
    pub related_hypotheses: Vec<String>,
    pub estimated_time: String,
    pub likelihood: f64,
}

/// Recommendation type: diagnostic (gather more information) or remedial
/// (take corrective action).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    Diagnostic,
    Remedial,
}

/// One actionable recommendation a pattern offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub action: String,
    #[serde(default)]
    pub tools: Vec<String>,
    pub expected_outcome: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_links: Option<Vec<String>>,
}

/// A named catalogue entry: indicators + optional negative indicators +
/// hypotheses + recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,
    pub indicators: Vec<Indicator>,
    #[serde(default)]
    pub negative_indicators: Vec<Indicator>,
    pub hypotheses: Vec<Hypothesis>,
    pub recommendations: Vec<Recommendation>,
}

fn default_quality_threshold() -> f64 {
    0.5
}

/// A catalogue file: one or more patterns plus optional worked test cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalogue {
    pub version: String,
    pub domain: String,
    pub description: String,
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// A worked example bundled with a catalogue for documentation/regression
/// purposes; not executed by the registry itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub problem_text: String,
    pub expected_pattern_id: String,
}
