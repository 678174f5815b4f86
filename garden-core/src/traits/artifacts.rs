use crate::errors::GardenResult;

/// Stored binary uploads referenced by `metadata.storedFilename`.
pub trait IArtifactStore: Send + Sync {
    /// Remove an artifact. Returns false if it did not exist.
    fn remove(&self, stored_filename: &str) -> GardenResult<bool>;
}
