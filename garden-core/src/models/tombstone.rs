use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::memory::Action;

/// Oblivion log entry for a permanently deleted memory. Keeps no payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tombstone {
    pub id: String,
    pub summary: String,
    /// Bucket the memory resolved to when it was deleted.
    pub bucket: Action,
    pub deleted_at: DateTime<Utc>,
}
