/// Storage-layer errors for SQLite and filesystem operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("corrupt record {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("I/O error at {path}: {reason}")]
    Io { path: String, reason: String },
}
