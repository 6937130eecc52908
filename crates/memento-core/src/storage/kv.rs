//! String key-value store contract used for milestone state.
//!
//! The trait is deliberately tiny: get returns `None` for anything
//! unreadable, set reports failure but callers are expected to swallow it
//! and continue in non-persistent mode.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::storage::data_dir;

pub trait KvStore {
    /// Read a key. Missing or unreadable keys are `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a key.
    ///
    /// # Errors
    /// Returns an error if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<K: KvStore> KvStore for &K {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// One file per key under a directory.
#[derive(Debug)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Open a store rooted at `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::OpenFailed {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { dir })
    }

    /// Open the default store under the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::OpenFailed {
            path: PathBuf::from("~/.config/memento"),
            message: e.to_string(),
        })?;
        Self::open(dir.join("state"))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.join(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::write(self.dir.join(key), value).map_err(|e| StoreError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}

/// In-memory store for tests and degraded (non-persistent) mode.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
