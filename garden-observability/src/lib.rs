//! # garden-observability
//!
//! Subscriber setup, span definitions per operation, structured log events,
//! and tracking of degradations to heuristic fallbacks.

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use tracing_setup::init_tracing;
