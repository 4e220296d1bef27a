//! Snapshot store backends: sled on disk, a map in memory.

use super::SnapshotStore;
use crate::error::{ApiError, StorageError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default on-disk location: `<platform data dir>/snapshot`.
pub fn default_snapshot_path() -> Result<PathBuf, ApiError> {
    let dirs = directories::ProjectDirs::from("", "canopy", "canopy").ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform data directory for snapshots".to_string())
    })?;
    Ok(dirs.data_dir().join("snapshot"))
}

/// sled-backed snapshot store.
pub struct SledSnapshotStore {
    db: sled::Db,
}

impl SledSnapshotStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = sled::open(path)?;
        Ok(Self { db })
    }
}

impl SnapshotStore for SledSnapshotStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.db.get(key.as_bytes())?.map(|v| v.to_vec()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.db.insert(key.as_bytes(), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db.remove(key.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

/// In-memory snapshot store.
#[derive(Default)]
pub struct MemorySnapshotStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}
