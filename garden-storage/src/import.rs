//! One-shot import of the legacy flat-file layout:
//!
//! ```text
//! <root>/memories/*.json   arrays of memory objects
//! <root>/clusters/*.json   cluster payloads (one record or an array)
//! ```
//!
//! Memory entries are decoded leniently; anything that still fails is
//! skipped and counted. Cluster payloads are stored verbatim under the file
//! stem and only interpreted when reconciling.

use std::fs;
use std::path::{Path, PathBuf};

use garden_core::errors::{GardenResult, StorageError};
use garden_core::memory::Memory;
use garden_core::models::StoredClusterRecord;
use garden_core::traits::IClusterRecordStore;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::engine::StorageEngine;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub memories_imported: usize,
    pub memories_skipped: usize,
    pub cluster_payloads: usize,
    /// Files that could not be read or were not JSON at all.
    pub unreadable_files: usize,
}

/// `*.json` files directly under `dir`, sorted by name. A missing directory
/// yields nothing.
fn json_files(dir: &Path) -> GardenResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir).map_err(|e| StorageError::Io {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn read_text(path: &Path, report: &mut ImportReport) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable legacy file");
            report.unreadable_files += 1;
            None
        }
    }
}

pub fn import_legacy_dir(engine: &StorageEngine, root: &Path) -> GardenResult<ImportReport> {
    let mut report = ImportReport::default();

    for path in json_files(&root.join("memories"))? {
        let Some(text) = read_text(&path, &mut report) else {
            continue;
        };
        let entries = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items,
            Ok(single @ Value::Object(_)) => vec![single],
            Ok(_) | Err(_) => {
                warn!(path = %path.display(), "legacy memory file is not a JSON array");
                report.unreadable_files += 1;
                continue;
            }
        };
        for entry in entries {
            match serde_json::from_value::<Memory>(entry) {
                Ok(memory) => {
                    engine.upsert(&memory)?;
                    report.memories_imported += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping malformed legacy memory");
                    report.memories_skipped += 1;
                }
            }
        }
    }

    for path in json_files(&root.join("clusters"))? {
        let Some(payload) = read_text(&path, &mut report) else {
            continue;
        };
        let key = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        engine.put_raw(&StoredClusterRecord { key, payload })?;
        report.cluster_payloads += 1;
    }

    info!(
        memories = report.memories_imported,
        skipped = report.memories_skipped,
        clusters = report.cluster_payloads,
        unreadable = report.unreadable_files,
        "legacy import finished"
    );
    Ok(report)
}
