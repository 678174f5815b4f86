use super::{ClassifierError, StorageError};

/// Top-level error for the memory garden.
#[derive(Debug, thiserror::Error)]
pub enum GardenError {
    #[error("memory not found: {id}")]
    MemoryNotFound { id: String },

    #[error("cluster not found: {id}")]
    ClusterNotFound { id: String },

    #[error("invalid cluster id: {raw}")]
    InvalidClusterId { raw: String },

    #[error("classifier error: {0}")]
    ClassifierError(#[from] ClassifierError),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),
}
