//! Key-value snapshot persistence.
//!
//! The stores keep their whole collection in memory and write a JSON snapshot
//! after every committed change. This module is the only place that touches
//! durable storage.
//!
//! # Failure policy
//!
//! Loading never fails: a missing namespace, an unreadable backend or a
//! snapshot that no longer parses all come back as `None`, and the caller
//! starts from an empty collection. Saving reports errors, but the stores only
//! log them - a failed write costs durability, never the mutation itself.
//!
//! # Backends
//!
//! - [`FileStore`] - one `<namespace>.json` file per namespace in a directory
//! - [`MemoryStore`] - process-local map, for tests and ephemeral sessions

mod file;
mod memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Namespace holding the cart line-item array.
pub const CART_NAMESPACE: &str = "satwa-cart";

/// Namespace holding the wishlist product array.
pub const WISHLIST_NAMESPACE: &str = "satwa-wishlist";

/// Errors raised by snapshot backends.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Namespace is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("Invalid namespace: {0:?}")]
    InvalidNamespace(String),

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized or the snapshot could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Raw string storage keyed by namespace.
pub trait SnapshotStore: Send + Sync {
    /// Read the stored string for `namespace`, or `None` if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, namespace: &str) -> Result<Option<String>, PersistenceError>;

    /// Durably replace the stored string for `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, namespace: &str, contents: &str) -> Result<(), PersistenceError>;
}

/// Typed save/load over a [`SnapshotStore`].
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct PersistenceAdapter {
    backend: Arc<dyn SnapshotStore>,
}

impl std::fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceAdapter").finish_non_exhaustive()
    }
}

impl PersistenceAdapter {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: impl SnapshotStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Adapter over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Serialize `value` to JSON and store it under `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace is invalid, the value cannot be
    /// serialized, or the backend write fails.
    pub fn save<T: Serialize + ?Sized>(
        &self,
        namespace: &str,
        value: &T,
    ) -> Result<(), PersistenceError> {
        validate_namespace(namespace)?;
        let json = serde_json::to_string(value)?;
        self.backend.write(namespace, &json)
    }

    /// Load and deserialize the snapshot under `namespace`.
    ///
    /// Returns `None` when nothing was saved, the backend fails, or the stored
    /// value does not parse as `T`. Failures are logged at `warn`.
    #[must_use]
    pub fn load<T: DeserializeOwned>(&self, namespace: &str) -> Option<T> {
        match self.try_load(namespace) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    namespace,
                    error = %e,
                    "Discarding unreadable snapshot, starting empty"
                );
                None
            }
        }
    }

    fn try_load<T: DeserializeOwned>(&self, namespace: &str) -> Result<Option<T>, PersistenceError> {
        validate_namespace(namespace)?;
        let Some(raw) = self.backend.read(namespace)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

/// Reject namespaces that could escape a storage directory or collide.
fn validate_namespace(namespace: &str) -> Result<(), PersistenceError> {
    let valid = !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidNamespace(namespace.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let adapter = PersistenceAdapter::in_memory();
        adapter.save("numbers", &vec![1, 2, 3]).unwrap();
        let loaded: Option<Vec<i32>> = adapter.load("numbers");
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_load_missing_namespace_is_none() {
        let adapter = PersistenceAdapter::in_memory();
        let loaded: Option<Vec<i32>> = adapter.load(CART_NAMESPACE);
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_corrupt_snapshot_is_none() {
        let store = MemoryStore::new();
        store.write(CART_NAMESPACE, "{not json").unwrap();
        let adapter = PersistenceAdapter::new(store);

        let loaded: Option<Vec<i32>> = adapter.load(CART_NAMESPACE);
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_wrong_shape_is_none() {
        let store = MemoryStore::new();
        store.write(WISHLIST_NAMESPACE, r#"{"items": 3}"#).unwrap();
        let adapter = PersistenceAdapter::new(store);

        let loaded: Option<Vec<String>> = adapter.load(WISHLIST_NAMESPACE);
        assert!(loaded.is_none());
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let adapter = PersistenceAdapter::in_memory();
        assert!(matches!(
            adapter.save("../etc/passwd", &1),
            Err(PersistenceError::InvalidNamespace(_))
        ));
        assert!(matches!(
            adapter.save("", &1),
            Err(PersistenceError::InvalidNamespace(_))
        ));
        let loaded: Option<i32> = adapter.load("a/b");
        assert!(loaded.is_none());
    }
}
