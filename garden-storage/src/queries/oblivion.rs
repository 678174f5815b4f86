//! Append and read tombstones.

use rusqlite::{params, Connection};

use garden_core::errors::GardenResult;
use garden_core::memory::{lenient::parse_timestamp, normalize};
use garden_core::models::Tombstone;

use crate::to_storage_err;

pub fn append_tombstone(conn: &Connection, tombstone: &Tombstone) -> GardenResult<()> {
    conn.execute(
        "INSERT INTO oblivion_log (memory_id, summary, bucket, deleted_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            tombstone.id,
            tombstone.summary,
            tombstone.bucket.as_str(),
            tombstone.deleted_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// In append order.
pub fn list_tombstones(conn: &Connection) -> GardenResult<Vec<Tombstone>> {
    let mut stmt = conn
        .prepare_cached("SELECT memory_id, summary, bucket, deleted_at FROM oblivion_log ORDER BY seq")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut tombstones = Vec::new();
    for row in rows {
        let (id, summary, bucket, deleted_at) = row.map_err(|e| to_storage_err(e.to_string()))?;
        tombstones.push(Tombstone {
            id,
            summary,
            bucket: normalize(Some(&bucket)),
            deleted_at: parse_timestamp(&deleted_at).unwrap_or_default(),
        });
    }
    Ok(tombstones)
}
