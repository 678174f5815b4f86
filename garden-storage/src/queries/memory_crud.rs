//! Insert, update, get, delete, and list memories.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use garden_core::errors::{GardenError, GardenResult};
use garden_core::memory::Memory;

use crate::to_storage_err;

pub fn insert_memory(conn: &Connection, memory: &Memory) -> GardenResult<()> {
    let payload = serde_json::to_string(memory)?;
    conn.execute(
        "INSERT INTO memories (id, created_at, size, payload, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            memory.id,
            memory.created_at.to_rfc3339(),
            memory.size as i64,
            payload,
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(format!("insert memory {}: {e}", memory.id)))?;
    Ok(())
}

/// Insert or replace, for imports.
pub fn upsert_memory(conn: &Connection, memory: &Memory) -> GardenResult<()> {
    let payload = serde_json::to_string(memory)?;
    conn.execute(
        "INSERT INTO memories (id, created_at, size, payload, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            created_at = excluded.created_at,
            size = excluded.size,
            payload = excluded.payload,
            updated_at = excluded.updated_at",
        params![
            memory.id,
            memory.created_at.to_rfc3339(),
            memory.size as i64,
            payload,
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(format!("upsert memory {}: {e}", memory.id)))?;
    Ok(())
}

/// Fails with `MemoryNotFound` when no row has this id.
pub fn update_memory(conn: &Connection, memory: &Memory) -> GardenResult<()> {
    let payload = serde_json::to_string(memory)?;
    let changed = conn
        .execute(
            "UPDATE memories SET created_at = ?2, size = ?3, payload = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                memory.id,
                memory.created_at.to_rfc3339(),
                memory.size as i64,
                payload,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(format!("update memory {}: {e}", memory.id)))?;
    if changed == 0 {
        return Err(GardenError::MemoryNotFound {
            id: memory.id.clone(),
        });
    }
    Ok(())
}

/// A row that no longer decodes is reported as corrupt.
pub fn get_memory(conn: &Connection, id: &str) -> GardenResult<Option<Memory>> {
    let payload: Option<String> = conn
        .query_row("SELECT payload FROM memories WHERE id = ?1", [id], |row| row.get(0))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    payload
        .map(|p| {
            serde_json::from_str(&p).map_err(|e| {
                GardenError::StorageError(garden_core::errors::StorageError::Corrupt {
                    key: id.to_string(),
                    reason: e.to_string(),
                })
            })
        })
        .transpose()
}

pub fn delete_memory(conn: &Connection, id: &str) -> GardenResult<bool> {
    let removed = conn
        .execute("DELETE FROM memories WHERE id = ?1", [id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(removed > 0)
}

/// Every stored memory, ordered by id. A row whose payload no longer decodes
/// is returned as [`Memory::unreadable`] built from its columns.
pub fn list_memories(conn: &Connection) -> GardenResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare_cached("SELECT id, created_at, size, payload FROM memories ORDER BY id")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut memories = Vec::new();
    for row in rows {
        let (id, created_at, size, payload) = row.map_err(|e| to_storage_err(e.to_string()))?;
        match serde_json::from_str::<Memory>(&payload) {
            Ok(memory) => memories.push(memory),
            Err(e) => {
                warn!(memory_id = %id, error = %e, "unreadable memory row, listing it with defaults");
                let created_at = DateTime::parse_from_rfc3339(&created_at)
                    .map(|t| t.with_timezone(&Utc))
                    .unwrap_or_default();
                memories.push(Memory::unreadable(id, size.max(0) as u64, created_at));
            }
        }
    }
    Ok(memories)
}

pub fn count_memories(conn: &Connection) -> GardenResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}
