//! Raw legacy cluster payloads keyed by their source name.

use chrono::Utc;
use rusqlite::{params, Connection};

use garden_core::errors::GardenResult;
use garden_core::models::StoredClusterRecord;

use crate::to_storage_err;

pub fn list_records(conn: &Connection) -> GardenResult<Vec<StoredClusterRecord>> {
    let mut stmt = conn
        .prepare_cached("SELECT key, payload FROM cluster_records ORDER BY key")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StoredClusterRecord {
                key: row.get(0)?,
                payload: row.get(1)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn put_record(conn: &Connection, record: &StoredClusterRecord) -> GardenResult<()> {
    conn.execute(
        "INSERT INTO cluster_records (key, payload, stored_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET payload = excluded.payload, stored_at = excluded.stored_at",
        params![record.key, record.payload, Utc::now().to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete_record(conn: &Connection, key: &str) -> GardenResult<bool> {
    let removed = conn
        .execute("DELETE FROM cluster_records WHERE key = ?1", [key])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(removed > 0)
}
