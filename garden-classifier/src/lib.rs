//! # garden-classifier
//!
//! Assigns each memory a retention verdict. The completion service is asked
//! first; any failure along the way (credential, transport, status, parse)
//! degrades to a rule-based verdict, so classification never fails.
//! The batch pipeline adds fingerprint-keyed caching, bounded fan-out, and
//! rate-limit pauses.

pub mod backend;
pub mod engine;
pub mod heuristic;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod refresh;
pub mod validate;

pub use backend::NimBackend;
pub use engine::{Classification, Classifier};
pub use heuristic::heuristic_analysis;
pub use pipeline::{AnalysisPipeline, AnalysisSource, AnalyzedMemory};
pub use refresh::refresh_stale;
