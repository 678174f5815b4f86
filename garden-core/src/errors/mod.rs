//! Error taxonomy. Subsystem enums convert into [`GardenError`].

mod classifier_error;
mod garden_error;
mod storage_error;

pub use classifier_error::{ClassifierError, FailureKind};
pub use garden_error::GardenError;
pub use storage_error::StorageError;

/// Convenience alias used across every crate.
pub type GardenResult<T> = Result<T, GardenError>;
