//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and common test scenarios.

use folio_core::{Config, Store};
use folio_storage::InMemoryBackend;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test store with automatic cleanup.
pub struct TestStore {
    /// The store instance.
    pub store: Store,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates a new in-memory test store.
    pub fn memory() -> Self {
        Self {
            store: Store::open_in_memory(),
            _temp_dir: None,
        }
    }

    /// Creates a new file-backed test store in a temporary directory.
    ///
    /// The data file does not exist until the store loads or persists.
    pub fn file() -> Self {
        Self::file_with(Config::new().name("test"))
    }

    /// Creates a file-backed test store, rooting `config` in a temporary
    /// directory.
    pub fn file_with(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Store::open(config.root(temp_dir.path())).expect("Failed to open file store");
        Self {
            store,
            _temp_dir: Some(temp_dir),
        }
    }

    /// Creates a store persisting to a shared in-memory buffer holding
    /// `data`.
    ///
    /// The returned backend observes everything the store persists.
    pub fn backed(config: Config, data: &str) -> (Self, InMemoryBackend) {
        let backend = InMemoryBackend::with_data(data);
        let store = Store::open_with_backend(config, Box::new(backend.clone()))
            .expect("Failed to open backed store");
        (
            Self {
                store,
                _temp_dir: None,
            },
            backend,
        )
    }

    /// Returns the data file path if file-backed, None otherwise.
    pub fn data_path(&self) -> Option<PathBuf> {
        self._temp_dir.as_ref().and_then(|_| self.store.config().data_path())
    }

    /// Opens and loads a second store over the same data file.
    pub fn reopen(&self) -> Store {
        let mut store = Store::open(self.store.config().clone()).expect("Failed to reopen store");
        store.load().expect("Failed to load reopened store");
        store
    }
}

impl std::ops::Deref for TestStore {
    type Target = Store;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// Runs a test with a temporary in-memory store.
///
/// # Example
///
/// ```rust
/// use folio_testkit::with_temp_store;
///
/// with_temp_store(|store| {
///     assert!(store.is_empty());
/// });
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut Store) -> R,
{
    let mut test_store = TestStore::memory();
    f(&mut test_store.store)
}

/// Runs a test with a temporary file-backed store.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut Store, &Path) -> R,
{
    let mut test_store = TestStore::file();
    let path = test_store
        .data_path()
        .expect("File store should have a path");
    f(&mut test_store.store, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use crate::vectors::sample_documents;
    use folio_core::Value;

    /// Creates a store holding the three sample documents.
    pub fn sample_store() -> TestStore {
        let mut test_store = TestStore::memory();
        test_store
            .insert(sample_documents())
            .expect("Failed to insert sample documents");
        test_store
    }

    /// Creates a store with `count` documents `{_id: "doc-<i>", index: i}`.
    pub fn populated_store(count: usize) -> TestStore {
        let mut test_store = TestStore::memory();
        let docs: Vec<Value> = (0..count)
            .map(|i| {
                Value::from(serde_json::json!({
                    "_id": format!("doc-{i}"),
                    "index": i,
                }))
            })
            .collect();
        test_store
            .insert(docs)
            .expect("Failed to insert documents");
        test_store
    }
}
