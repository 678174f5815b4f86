use serde::{Deserialize, Serialize};

use super::defaults;

/// Durable store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    pub db_path: String,
    /// Number of read connections in the pool.
    pub read_pool_size: usize,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
    /// Directory holding uploaded binary artifacts.
    pub uploads_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: defaults::DEFAULT_DB_FILENAME.to_string(),
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
            uploads_dir: defaults::DEFAULT_UPLOADS_DIR.to_string(),
        }
    }
}
