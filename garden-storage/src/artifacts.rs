//! Stored upload files referenced by `metadata.storedFilename`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use garden_core::errors::{GardenResult, StorageError};
use garden_core::traits::IArtifactStore;
use tracing::debug;

pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Only bare file names resolve; anything that could escape the root
    /// does not.
    fn resolve(&self, stored_filename: &str) -> Option<PathBuf> {
        let mut components = Path::new(stored_filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Some(self.root.join(name)),
            _ => None,
        }
    }
}

impl IArtifactStore for FsArtifactStore {
    fn remove(&self, stored_filename: &str) -> GardenResult<bool> {
        let Some(path) = self.resolve(stored_filename) else {
            return Err(StorageError::Io {
                path: stored_filename.to_string(),
                reason: "not a bare file name".into(),
            }
            .into());
        };
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "artifact removed");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_existing_file_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        let store = FsArtifactStore::new(dir.path());
        assert!(store.remove("a.jpg").unwrap());
        assert!(!store.remove("a.jpg").unwrap());
    }

    #[test]
    fn rejects_paths_outside_root() {
        let store = FsArtifactStore::new("/tmp/uploads");
        assert!(store.remove("../etc/passwd").is_err());
        assert!(store.remove("nested/file.jpg").is_err());
        assert!(store.remove("").is_err());
    }
}
