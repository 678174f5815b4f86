//! StorageEngine: owns the connection pool, runs migrations on open, and
//! implements the repository traits.

use std::path::Path;

use garden_core::config::{defaults, StorageConfig};
use garden_core::errors::GardenResult;
use garden_core::memory::Memory;
use garden_core::models::{StoredClusterRecord, Tombstone, UserProfile};
use garden_core::traits::{IClusterRecordStore, IMemoryStore, IOblivionLog, IProfileStore};
use rusqlite::Connection;
use tracing::info;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{cluster_records, memory_crud, oblivion, profile};

pub struct StorageEngine {
    pool: ConnectionPool,
    /// False in in-memory mode, where reader connections are separate
    /// databases and all reads go through the writer.
    use_read_pool: bool,
}

impl StorageEngine {
    pub fn open(path: &Path) -> GardenResult<Self> {
        Self::open_with(path, defaults::DEFAULT_READ_POOL_SIZE, defaults::DEFAULT_BUSY_TIMEOUT_MS)
    }

    pub fn from_config(config: &StorageConfig) -> GardenResult<Self> {
        Self::open_with(Path::new(&config.db_path), config.read_pool_size, config.busy_timeout_ms)
    }

    fn open_with(path: &Path, read_pool_size: usize, busy_timeout_ms: u32) -> GardenResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size, busy_timeout_ms)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        info!(path = %path.display(), "storage opened");
        Ok(engine)
    }

    pub fn open_in_memory() -> GardenResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open_in_memory()?,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> GardenResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn schema_version(&self) -> GardenResult<u32> {
        self.with_reader(migrations::current_version)
    }

    /// Insert or replace a memory.
    pub fn upsert(&self, memory: &Memory) -> GardenResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| memory_crud::upsert_memory(conn, memory))
    }

    fn with_reader<F, T>(&self, f: F) -> GardenResult<T>
    where
        F: FnOnce(&Connection) -> GardenResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl IMemoryStore for StorageEngine {
    fn create(&self, memory: &Memory) -> GardenResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| memory_crud::insert_memory(conn, memory))
    }

    fn get(&self, id: &str) -> GardenResult<Option<Memory>> {
        self.with_reader(|conn| memory_crud::get_memory(conn, id))
    }

    fn update(&self, memory: &Memory) -> GardenResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| memory_crud::update_memory(conn, memory))
    }

    fn delete(&self, id: &str) -> GardenResult<bool> {
        self.pool
            .writer
            .with_conn_sync(|conn| memory_crud::delete_memory(conn, id))
    }

    fn list_all(&self) -> GardenResult<Vec<Memory>> {
        self.with_reader(memory_crud::list_memories)
    }

    fn count(&self) -> GardenResult<usize> {
        self.with_reader(memory_crud::count_memories)
    }
}

impl IClusterRecordStore for StorageEngine {
    fn list_raw(&self) -> GardenResult<Vec<StoredClusterRecord>> {
        self.with_reader(cluster_records::list_records)
    }

    fn put_raw(&self, record: &StoredClusterRecord) -> GardenResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| cluster_records::put_record(conn, record))
    }

    fn delete_raw(&self, key: &str) -> GardenResult<bool> {
        self.pool
            .writer
            .with_conn_sync(|conn| cluster_records::delete_record(conn, key))
    }
}

impl IOblivionLog for StorageEngine {
    fn append(&self, tombstone: &Tombstone) -> GardenResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| oblivion::append_tombstone(conn, tombstone))
    }

    fn list(&self) -> GardenResult<Vec<Tombstone>> {
        self.with_reader(oblivion::list_tombstones)
    }
}

impl IProfileStore for StorageEngine {
    fn load_profile(&self) -> GardenResult<Option<UserProfile>> {
        self.with_reader(profile::load_profile)
    }

    fn save_profile(&self, user_profile: &UserProfile) -> GardenResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| profile::save_profile(conn, user_profile))
    }
}
