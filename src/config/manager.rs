//! Snapshot storage backends
//!
//! The store only needs whole-value get/set by key. `FileSnapshotStore`
//! keeps one JSON file per key in the data directory and replaces it
//! atomically; `MemorySnapshotStore` backs tests and embedders that persist
//! elsewhere.

use crate::error::{CubeError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "SMART_CUBE_DATA_DIR";

/// Directory name used under `%APPDATA%` or the working directory
const APP_DIR: &str = "SmartFocusCube";

/// Key-value storage for the persisted snapshot
pub trait SnapshotStore: Send + Sync {
    /// Stored value for `key`, `None` when nothing was ever written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory snapshot storage
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed snapshot storage, one `<key>.json` per key
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Store files under `dir` (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store files under [`FileSnapshotStore::default_dir`]
    pub fn at_default_location() -> Self {
        Self::new(Self::default_dir())
    }

    /// Resolve the data directory
    ///
    /// Returns: `$SMART_CUBE_DATA_DIR`, else `%APPDATA%\SmartFocusCube`,
    /// else `./SmartFocusCube`
    pub fn default_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return PathBuf::from(dir);
        }
        let base = std::env::var_os("APPDATA").map_or_else(|| PathBuf::from("."), PathBuf::from);
        base.join(APP_DIR)
    }

    /// Data directory of this store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    ///
    /// Characters outside `[A-Za-z0-9._-]` are replaced so a key can never
    /// escape the data directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_stem}.json"))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("Read snapshot from {}", path.display());
                Ok(Some(contents))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No snapshot at {}, using defaults", path.display());
                Ok(None)
            }
            Err(e) => Err(CubeError::StorageError(Box::new(e))),
        }
    }

    /// Atomic write: write to a temp file in the same directory, then rename
    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&path)
            .map_err(|e| CubeError::StorageError(Box::new(e.error)))?;

        debug!("Snapshot written to {}", path.display());
        Ok(())
    }
}
