//! In-memory collection mirrored to a backing store blob.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use super::PersistenceError;
use super::backing::BackingStore;

/// One logical collection held in memory and mirrored to a named blob.
///
/// Reads and mutations go through a mutex. A mutation is serialized and
/// written to the backing store before the lock is released, so no caller can
/// observe memory that has moved ahead of durable state.
pub struct Collection<T> {
    name: &'static str,
    data: Mutex<T>,
    store: Arc<dyn BackingStore>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Load the collection stored under `name`.
    ///
    /// A missing blob yields `T::default()`. So does a blob that fails to
    /// load or decode; that case is logged.
    pub fn load(name: &'static str, store: Arc<dyn BackingStore>) -> Self {
        let data = match store.load(name) {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(blob = %name, error = %e, "Stored collection is unreadable, starting empty");
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                warn!(blob = %name, error = %e, "Failed to load collection, starting empty");
                T::default()
            }
        };

        Self {
            name,
            data: Mutex::new(data),
            store,
        }
    }

    /// Blob name this collection persists under.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Run `f` against the current contents.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    /// Clone the current contents.
    #[must_use]
    pub fn snapshot(&self) -> T
    where
        T: Clone,
    {
        self.lock().clone()
    }

    /// Apply `f` and persist the result before returning.
    ///
    /// A failed save is logged and otherwise ignored: the in-memory change
    /// stands and the process keeps working until it restarts.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        let result = f(&mut guard);
        if let Err(e) = self.persist(&guard) {
            error!(blob = %self.name, error = %e, "Failed to persist collection");
        }
        result
    }

    fn persist(&self, data: &T) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec(data).map_err(|source| PersistenceError::Serialization {
            name: self.name.to_string(),
            source,
        })?;
        self.store.save(self.name, &bytes)
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        // A poisoned lock still guards a complete value.
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::backing::{MemoryBackingStore, NullBackingStore};

    /// Store whose writes always fail.
    struct FailingStore;

    impl BackingStore for FailingStore {
        fn load(&self, _name: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
            Ok(None)
        }

        fn save(&self, name: &str, _bytes: &[u8]) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io {
                name: name.to_string(),
                source: std::io::Error::other("disk full"),
            })
        }

        fn clear(&self, _name: &str) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_blob_loads_default() {
        let collection: Collection<Vec<u32>> = Collection::load("numbers", Arc::new(NullBackingStore));
        assert!(collection.snapshot().is_empty());
    }

    #[test]
    fn test_mutation_is_persisted() {
        let store = MemoryBackingStore::new();
        let collection: Collection<Vec<u32>> = Collection::load("numbers", Arc::new(store.clone()));

        collection.mutate(|v| v.push(7));

        let bytes = store.load("numbers").unwrap().unwrap();
        let stored: Vec<u32> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(stored, vec![7]);
    }

    #[test]
    fn test_reload_sees_previous_writes() {
        let store = MemoryBackingStore::new();
        let first: Collection<Vec<u32>> = Collection::load("numbers", Arc::new(store.clone()));
        first.mutate(|v| v.extend([1, 2, 3]));

        let second: Collection<Vec<u32>> = Collection::load("numbers", Arc::new(store));
        assert_eq!(second.snapshot(), vec![1, 2, 3]);
    }

    #[test]
    fn test_corrupt_blob_loads_default() {
        let store = MemoryBackingStore::new();
        store.save("numbers", b"{not json").unwrap();

        let collection: Collection<Vec<u32>> = Collection::load("numbers", Arc::new(store));
        assert!(collection.snapshot().is_empty());
    }

    #[test]
    fn test_failed_save_keeps_memory_change() {
        let collection: Collection<Vec<u32>> = Collection::load("numbers", Arc::new(FailingStore));

        let len = collection.mutate(|v| {
            v.push(1);
            v.len()
        });

        assert_eq!(len, 1);
        assert_eq!(collection.snapshot(), vec![1]);
    }
}
