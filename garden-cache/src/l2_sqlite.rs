//! L2 SQLite-backed analysis cache.
//!
//! One row per fingerprint. Survives process restarts. Rows that fail to
//! decode are logged, evicted, and reported as a miss.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use garden_core::errors::{GardenResult, StorageError};
use garden_core::memory::lenient::parse_timestamp;
use garden_core::Analysis;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::CachedAnalysis;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS analysis_cache (
        fingerprint TEXT PRIMARY KEY,
        payload     TEXT NOT NULL,
        cached_at   TEXT NOT NULL
    );
";

fn to_storage_err(e: rusqlite::Error) -> StorageError {
    StorageError::Sqlite {
        message: e.to_string(),
    }
}

pub struct L2SqliteCache {
    conn: Mutex<Connection>,
}

impl L2SqliteCache {
    /// Open (or create) a file-backed cache.
    pub fn open(path: &Path) -> GardenResult<Self> {
        let conn = Connection::open(path).map_err(to_storage_err)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")
            .map_err(to_storage_err)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> GardenResult<Self> {
        let conn = Connection::open_in_memory().map_err(to_storage_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> GardenResult<Self> {
        conn.execute_batch(SCHEMA).map_err(to_storage_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // Poisoning is ignored; the connection itself stays usable.
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up an entry. Never fails: read errors and corrupt rows are misses.
    pub fn get(&self, fingerprint: &str) -> Option<CachedAnalysis> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT payload, cached_at FROM analysis_cache WHERE fingerprint = ?1",
                params![fingerprint],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional();

        let (payload, cached_at) = match row {
            Ok(Some(row)) => row,
            Ok(None) => return None,
            Err(e) => {
                warn!(fingerprint, error = %e, "L2 cache read failed, treating as miss");
                return None;
            }
        };

        match decode(&payload, &cached_at) {
            Ok(entry) => Some(entry),
            Err(reason) => {
                warn!(fingerprint, %reason, "corrupt L2 cache entry, evicting");
                if let Err(e) = conn.execute(
                    "DELETE FROM analysis_cache WHERE fingerprint = ?1",
                    params![fingerprint],
                ) {
                    debug!(fingerprint, error = %e, "failed to evict corrupt entry");
                }
                None
            }
        }
    }

    /// Insert or replace an entry (last write wins).
    pub fn insert(&self, fingerprint: &str, entry: &CachedAnalysis) -> GardenResult<()> {
        let payload = serde_json::to_string(&entry.analysis)?;
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO analysis_cache (fingerprint, payload, cached_at)
                 VALUES (?1, ?2, ?3)",
                params![fingerprint, payload, entry.cached_at.to_rfc3339()],
            )
            .map_err(to_storage_err)?;
        Ok(())
    }

    pub fn remove(&self, fingerprint: &str) -> GardenResult<bool> {
        let removed = self
            .conn()
            .execute(
                "DELETE FROM analysis_cache WHERE fingerprint = ?1",
                params![fingerprint],
            )
            .map_err(to_storage_err)?;
        Ok(removed > 0)
    }

    pub fn len(&self) -> GardenResult<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM analysis_cache", [], |row| row.get(0))
            .map_err(to_storage_err)?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> GardenResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&self) -> GardenResult<()> {
        self.conn()
            .execute("DELETE FROM analysis_cache", [])
            .map_err(to_storage_err)?;
        Ok(())
    }
}

fn decode(payload: &str, cached_at: &str) -> Result<CachedAnalysis, String> {
    let cached_at: DateTime<Utc> =
        parse_timestamp(cached_at).ok_or_else(|| format!("bad timestamp {cached_at:?}"))?;
    let value: serde_json::Value = serde_json::from_str(payload).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("payload is not an object".to_string());
    }
    let analysis: Analysis = serde_json::from_value(value).map_err(|e| e.to_string())?;
    Ok(CachedAnalysis {
        analysis,
        cached_at,
    })
}
