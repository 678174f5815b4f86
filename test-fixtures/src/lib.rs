//! Test fixtures for the memory garden: record builders, a scripted
//! completion backend, and the legacy on-disk JSON layouts.

mod backend;
mod builders;

pub use backend::ScriptedBackend;
pub use builders::{cluster_record_json, model_response, MemoryBuilder};

use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Root directory of the test-fixtures folder.
pub fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);
    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!("Could not find test-fixtures directory from CARGO_MANIFEST_DIR={manifest_dir}");
        }
    }
    path.join("test-fixtures")
}

/// Absolute path to a fixture file or directory.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Directory laid out like a legacy data root (`memories/`, `clusters/`).
pub fn legacy_root() -> PathBuf {
    fixture_path("legacy")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as text, without parsing it.
pub fn load_fixture_text(relative_path: &str) -> String {
    let path = fixture_path(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}
