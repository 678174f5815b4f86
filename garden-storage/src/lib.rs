//! # garden-storage
//!
//! Durable repository for the memory garden: memories, raw legacy cluster
//! records, the oblivion log, and the user profile, in one SQLite database
//! with a single writer and a pool of readers. Also imports the legacy
//! flat-file layout and removes stored upload artifacts.

pub mod artifacts;
pub mod engine;
pub mod import;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use artifacts::FsArtifactStore;
pub use engine::StorageEngine;
pub use import::{import_legacy_dir, ImportReport};

use garden_core::errors::{GardenError, StorageError};

/// Wrap a SQLite failure message as a storage error.
pub(crate) fn to_storage_err(message: impl Into<String>) -> GardenError {
    GardenError::StorageError(StorageError::Sqlite {
        message: message.into(),
    })
}
