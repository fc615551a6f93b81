//! Directory-backed snapshot store.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{PersistenceError, SnapshotStore};

/// Stores each namespace as `<dir>/<namespace>.json`.
///
/// Writes go to a sibling temp file that is then renamed over the snapshot,
/// so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the snapshots.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn snapshot_path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.json"))
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, namespace: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.snapshot_path(namespace)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, namespace: &str, contents: &str) -> Result<(), PersistenceError> {
        let path = self.snapshot_path(namespace);
        let tmp = self.dir.join(format!(".{namespace}.json.tmp"));

        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &path)?;
        tracing::debug!(namespace, path = %path.display(), "Snapshot written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.read("satwa-cart").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.write("satwa-cart", "[1,2]").unwrap();
        store.write("satwa-cart", "[3]").unwrap();

        assert_eq!(store.read("satwa-cart").unwrap().as_deref(), Some("[3]"));
        assert!(dir.path().join("satwa-cart.json").exists());
        assert!(!dir.path().join(".satwa-cart.json.tmp").exists());
    }

    #[test]
    fn test_open_creates_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        assert_eq!(store.dir(), nested.as_path());
        assert!(nested.is_dir());
    }

    #[test]
    fn test_snapshots_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::open(dir.path())
            .unwrap()
            .write("satwa-wishlist", "[]")
            .unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.read("satwa-wishlist").unwrap().as_deref(),
            Some("[]")
        );
    }
}
