mod artifacts;
mod completion;
mod storage;

pub use artifacts::IArtifactStore;
pub use completion::ICompletionBackend;
pub use storage::{IClusterRecordStore, IMemoryStore, IOblivionLog, IProfileStore};
