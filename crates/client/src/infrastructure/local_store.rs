//! File-backed local key-value store.
//!
//! One file per key under an explicit root directory - the desktop
//! counterpart of browser local storage. Keys here are fixed constants
//! (see the guest service), never user input.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ports::outbound::{LocalStorePort, StorageError};

/// Key-value store persisting each key as `<root>/<key>.json`.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the platform data directory, if one exists.
    pub fn at_default_location() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("app", "Loadout", "loadout")?;
        Some(Self::new(dirs.data_dir()))
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl LocalStorePort for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::read(key, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.root).map_err(|e| StorageError::write(key, e))?;
        std::fs::write(self.path_for(key), value).map_err(|e| StorageError::write(key, e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::write(key, err)),
        }
    }
}
