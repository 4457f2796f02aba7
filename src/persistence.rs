//! Best-effort storage for the pinned-id set.
//!
//! Nothing here ever reports failure to the navigator: a broken store means the pins live in
//! memory only for this session.

use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const DEFAULT_PINNED_KEY: &str = "pinnedItems";

/// Load/save contract the navigator relies on
#[cfg_attr(test, mockall::automock)]
pub trait PinPersistence {
    /// Pinned ids in stored order; empty on any failure
    fn load(&self) -> Vec<String>;
    /// Replace the stored set; failures are swallowed
    fn save(&mut self, ids: &[String]);
}

/// A string key/value store, in the spirit of a browser's local storage
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.directory.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.directory)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same map, so a second navigator built from a clone sees
/// what the first one saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Pinned ids stored as a JSON array of strings under a single key
#[derive(Debug, Clone)]
pub struct PinnedStore<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PinnedStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn with_default_key(store: S) -> Self {
        Self::new(store, DEFAULT_PINNED_KEY)
    }

    fn try_load(&self) -> Result<Vec<String>> {
        match self.store.get_item(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn try_save(&mut self, ids: &[String]) -> Result<()> {
        let payload = serde_json::to_string(ids)?;
        self.store.set_item(&self.key, &payload)
    }
}

impl<S: KeyValueStore> PinPersistence for PinnedStore<S> {
    fn load(&self) -> Vec<String> {
        match self.try_load() {
            Ok(ids) => {
                log::debug!("PinnedStore: loaded {} pinned ids from {:?}", ids.len(), self.key);
                ids
            }
            Err(e) => {
                log::warn!("PinnedStore: ignoring unreadable pins under {:?}: {}", self.key, e);
                Vec::new()
            }
        }
    }

    fn save(&mut self, ids: &[String]) {
        if let Err(e) = self.try_save(ids) {
            log::warn!("PinnedStore: failed to persist {} pins: {}", ids.len(), e);
        }
    }
}
