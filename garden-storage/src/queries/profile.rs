//! The single user profile row.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use garden_core::errors::{GardenError, GardenResult, StorageError};
use garden_core::models::UserProfile;

use crate::to_storage_err;

pub fn load_profile(conn: &Connection) -> GardenResult<Option<UserProfile>> {
    let payload: Option<String> = conn
        .query_row("SELECT payload FROM user_profile WHERE id = 1", [], |row| row.get(0))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    payload
        .map(|p| {
            serde_json::from_str(&p).map_err(|e| {
                GardenError::StorageError(StorageError::Corrupt {
                    key: "user_profile".into(),
                    reason: e.to_string(),
                })
            })
        })
        .transpose()
}

pub fn save_profile(conn: &Connection, profile: &UserProfile) -> GardenResult<()> {
    let payload = serde_json::to_string(profile)?;
    conn.execute(
        "INSERT INTO user_profile (id, payload, updated_at) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
        params![payload, Utc::now().to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
