//! Durable key-value backing stores.
//!
//! A backing store holds named byte blobs. It is the only layer that touches
//! real I/O, and it is deliberately synchronous: every call is a single small
//! read or write of one blob.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::PersistenceError;

/// Named-blob persistence medium beneath the in-memory collections.
///
/// Implementations must be thread-safe. A store with no medium behind it
/// (see [`NullBackingStore`]) reports every blob as absent and accepts every
/// write; callers must tolerate that.
pub trait BackingStore: Send + Sync {
    /// Load the blob stored under `name`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Io` if the medium exists but cannot be read.
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Replace the blob stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Io` if the write fails.
    fn save(&self, name: &str, bytes: &[u8]) -> Result<(), PersistenceError>;

    /// Remove the blob stored under `name`. Removing a missing blob succeeds.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Io` if the removal fails.
    fn clear(&self, name: &str) -> Result<(), PersistenceError>;
}

// =============================================================================
// File
// =============================================================================

/// Stores each blob as `<dir>/<name>.json`.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// target, so a reader never sees a half-written blob.
#[derive(Debug, Clone)]
pub struct FileBackingStore {
    dir: PathBuf,
}

impl FileBackingStore {
    /// Create a store rooted at `dir`. The directory is created lazily.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn blob_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl BackingStore for FileBackingStore {
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let path = self.blob_path(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }

    fn save(&self, name: &str, bytes: &[u8]) -> Result<(), PersistenceError> {
        let io_err = |source| PersistenceError::Io {
            name: name.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        let target = self.blob_path(name);
        let tmp = self.dir.join(format!(".{name}.json.tmp"));
        {
            let mut file = fs::File::create(&tmp).map_err(io_err)?;
            file.write_all(bytes).map_err(io_err)?;
            file.sync_all().map_err(io_err)?;
        }
        fs::rename(&tmp, &target).map_err(io_err)?;

        debug!(blob = %name, bytes = bytes.len(), "Blob saved");
        Ok(())
    }

    fn clear(&self, name: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.blob_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}

// =============================================================================
// Memory
// =============================================================================

/// Process-local store. Clones share the same blobs.
///
/// Building a second cache over a clone of the same store is how tests
/// simulate a process restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackingStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBackingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the blobs currently held, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = blobs.keys().cloned().collect();
        names.sort();
        names
    }
}

impl BackingStore for MemoryBackingStore {
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.get(name).cloned())
    }

    fn save(&self, name: &str, bytes: &[u8]) -> Result<(), PersistenceError> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn clear(&self, name: &str) -> Result<(), PersistenceError> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        Ok(())
    }
}

// =============================================================================
// Null
// =============================================================================

/// Store used when no persistence medium is available.
///
/// Everything reads as absent and every write silently succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackingStore;

impl BackingStore for NullBackingStore {
    fn load(&self, _name: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(None)
    }

    fn save(&self, _name: &str, _bytes: &[u8]) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn clear(&self, _name: &str) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBackingStore::new(dir.path().join("data"));

        assert!(store.load("marketplace_cart").unwrap().is_none());
        store.save("marketplace_cart", b"[]").unwrap();
        assert_eq!(store.load("marketplace_cart").unwrap().unwrap(), b"[]");

        store.save("marketplace_cart", b"[1]").unwrap();
        assert_eq!(store.load("marketplace_cart").unwrap().unwrap(), b"[1]");
    }

    #[test]
    fn test_file_store_clear_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBackingStore::new(dir.path());

        store.clear("never_written").unwrap();
        store.save("blob", b"x").unwrap();
        store.clear("blob").unwrap();
        assert!(store.load("blob").unwrap().is_none());
    }

    #[test]
    fn test_file_store_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBackingStore::new(dir.path());
        store.save("blob", b"{}").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["blob.json".to_string()]);
    }

    #[test]
    fn test_memory_store_clones_share_blobs() {
        let store = MemoryBackingStore::new();
        let other = store.clone();

        store.save("a", b"1").unwrap();
        assert_eq!(other.load("a").unwrap().unwrap(), b"1");
        assert_eq!(other.names(), vec!["a".to_string()]);

        other.clear("a").unwrap();
        assert!(store.load("a").unwrap().is_none());
    }

    #[test]
    fn test_null_store_is_silent() {
        let store = NullBackingStore;
        store.save("a", b"1").unwrap();
        assert!(store.load("a").unwrap().is_none());
        store.clear("a").unwrap();
    }
}
