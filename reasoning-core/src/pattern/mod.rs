//! C4 — Pattern Registry + Matcher.
//!
//! Loads and validates pattern catalogues at startup, then matches problem
//! text against the resulting read-only registry (`spec.md` §4.4).

pub mod keyterms;
pub mod matcher;
pub mod registry;
pub mod types;

pub use keyterms::{extract_key_terms, KeyTerms};
pub use matcher::{match_patterns, PatternMatchResult};
pub use registry::PatternRegistry;
pub use types::{
    Catalogue, Hypothesis, Indicator, IndicatorType, KeyTermCategory, Pattern, Recommendation,
    RecommendationType, Severity, TestCase,
};
