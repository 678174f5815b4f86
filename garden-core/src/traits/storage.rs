use crate::errors::GardenResult;
use crate::memory::Memory;
use crate::models::{StoredClusterRecord, Tombstone, UserProfile};

/// Persisted memory records. The id is the primary key.
pub trait IMemoryStore: Send + Sync {
    fn create(&self, memory: &Memory) -> GardenResult<()>;
    fn get(&self, id: &str) -> GardenResult<Option<Memory>>;
    fn update(&self, memory: &Memory) -> GardenResult<()>;
    /// Returns whether a record was removed.
    fn delete(&self, id: &str) -> GardenResult<bool>;
    /// Every readable record, ordered by id. Unreadable rows are skipped.
    fn list_all(&self) -> GardenResult<Vec<Memory>>;
    fn count(&self) -> GardenResult<usize>;
}

/// Legacy cluster payloads, stored raw and interpreted on read.
pub trait IClusterRecordStore: Send + Sync {
    fn list_raw(&self) -> GardenResult<Vec<StoredClusterRecord>>;
    fn put_raw(&self, record: &StoredClusterRecord) -> GardenResult<()>;
    fn delete_raw(&self, key: &str) -> GardenResult<bool>;
}

/// Append-only log of permanently deleted memories.
pub trait IOblivionLog: Send + Sync {
    fn append(&self, tombstone: &Tombstone) -> GardenResult<()>;
    fn list(&self) -> GardenResult<Vec<Tombstone>>;
}

pub trait IProfileStore: Send + Sync {
    fn load_profile(&self) -> GardenResult<Option<UserProfile>>;
    fn save_profile(&self, profile: &UserProfile) -> GardenResult<()>;
}
