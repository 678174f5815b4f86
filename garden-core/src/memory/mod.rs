//! The memory record, its analysis, and the action taxonomy.

mod action;
mod analysis;
mod base;
mod kind;
pub mod lenient;
mod lifecycle;

pub use action::{normalize, normalize_value, Action};
pub use analysis::{Analysis, Sentiment, SentimentLabel};
pub use base::{Memory, MemoryMetadata};
pub use kind::MemoryKind;
pub use lifecycle::ClassificationState;
