//! In-process snapshot store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{PersistenceError, SnapshotStore};

/// Keeps snapshots in a map for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, namespace: &str) -> Result<Option<String>, PersistenceError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(namespace).cloned())
    }

    fn write(&self, namespace: &str, contents: &str) -> Result<(), PersistenceError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(namespace.to_string(), contents.to_string());
        Ok(())
    }
}
