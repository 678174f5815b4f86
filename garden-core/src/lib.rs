//! # garden-core
//!
//! Foundation crate for the memory garden.
//! Defines the data model, the action normalizer, content fingerprinting,
//! errors, config, and the storage/backend traits.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod fingerprint;
pub mod memory;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::GardenConfig;
pub use errors::{GardenError, GardenResult};
pub use fingerprint::Fingerprint;
pub use memory::{Action, Analysis, ClassificationState, Memory, MemoryKind, Sentiment};
pub use models::{Cluster, ClusterId, ClusterRecord, DeletionReport, Tombstone, UserProfile};
