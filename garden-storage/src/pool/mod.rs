//! Single write connection plus a round-robin pool of readers.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use garden_core::errors::GardenResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    pub fn open(path: &Path, read_pool_size: usize, busy_timeout_ms: u32) -> GardenResult<Self> {
        // The writer goes first so the file and WAL exist before readers attach.
        let writer = WriteConnection::open(path, busy_timeout_ms)?;
        let readers = ReadPool::open(path, read_pool_size, busy_timeout_ms)?;
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// In-memory readers are separate databases; callers route reads
    /// through the writer instead.
    pub fn open_in_memory() -> GardenResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory()?,
            readers: ReadPool::open_in_memory(1)?,
            db_path: None,
        })
    }
}
