//! Versioned schema migrations, recorded in `schema_version`.

pub mod v001_memories;
pub mod v002_cluster_records;
pub mod v003_oblivion_log;
pub mod v004_user_profile;

use garden_core::errors::{GardenResult, StorageError};
use rusqlite::{params, Connection};
use tracing::info;

pub const LATEST_VERSION: u32 = 4;

const MIGRATIONS: &[(u32, &str)] = &[
    (1, v001_memories::MIGRATION_SQL),
    (2, v002_cluster_records::MIGRATION_SQL),
    (3, v003_oblivion_log::MIGRATION_SQL),
    (4, v004_user_profile::MIGRATION_SQL),
];

fn failed(version: u32, e: rusqlite::Error) -> StorageError {
    StorageError::MigrationFailed {
        version,
        reason: e.to_string(),
    }
}

/// Apply every pending migration, each in its own transaction.
/// Returns the schema version afterwards.
pub fn run_migrations(conn: &Connection) -> GardenResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )
    .map_err(|e| failed(0, e))?;

    let current = current_version(conn)?;
    for &(version, sql) in MIGRATIONS {
        if version <= current {
            continue;
        }
        let tx = conn.unchecked_transaction().map_err(|e| failed(version, e))?;
        tx.execute_batch(sql).map_err(|e| failed(version, e))?;
        tx.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
            params![version, chrono::Utc::now().to_rfc3339()],
        )
        .map_err(|e| failed(version, e))?;
        tx.commit().map_err(|e| failed(version, e))?;
        info!(version, "applied migration");
    }
    current_version(conn)
}

pub fn current_version(conn: &Connection) -> GardenResult<u32> {
    let version: u32 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| {
            row.get(0)
        })
        .map_err(|e| failed(0, e))?;
    Ok(version)
}
