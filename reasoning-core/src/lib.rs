//! # Reasoning Core
//!
//! Core data structures and algorithms for the cognitive reasoning engine:
//! parallel reasoning streams, bias and evidence detection, multi-dimensional
//! confidence assessment, pattern matching and insight generation.
//!
//! ## Module Organization
//!
//! ### Primary APIs
//! - [`coordinator`]: Dispatches the four reasoning streams and composes a run (C7)
//! - [`streams`]: The four polymorphic reasoning streams (C6)
//! - [`confidence`]: Multi-dimensional confidence assessment (C3)
//! - [`pattern`] / [`insight`]: Pattern matching and insight generation (C4/C5)
//!
//! ### Support Modules
//! - [`problem`]: The `Problem`/`Context`/`Evidence` input types (§3)
//! - [`evidence`]: Evidence-type extraction from free text (C1)
//! - [`bias`]: Cognitive-bias detection over a reasoning transcript (C2)
//! - [`step`]: `ReasoningStep`, the atomic transcript unit
//! - [`communication`]: Client-facing formatting over a completed assessment (C9)
//! - [`config`]: Engine-wide tunables and calibration
//! - [`error`] / [`retry`]: Error taxonomy and backoff-with-jitter retry

pub mod bias;
pub mod communication;
pub mod config;
pub mod confidence;
pub mod coordinator;
pub mod error;
pub mod evidence;
pub mod insight;
pub mod pattern;
pub mod problem;
pub mod retry;
pub mod step;
pub mod streams;

pub use error::{Error, Result};
