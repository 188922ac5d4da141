//! CLI command implementations.

pub mod compact;
pub mod inspect;
pub mod verify;

use folio_core::{Config, CoreResult, Store};
use std::path::Path;

/// Opens the store for an existing data file.
///
/// The commands never create a data file that is not already there.
pub(crate) fn open_store(root: &Path, name: &str, strict: bool) -> CoreResult<Store> {
    let config = Config::new()
        .name(name)
        .root(root)
        .strict(strict)
        .create_if_missing(false);
    Store::open(config)
}

/// Size of the data file in bytes, if it exists.
pub(crate) fn file_size(store: &Store) -> Result<u64, Box<dyn std::error::Error>> {
    use folio_storage::{FileBackend, StorageBackend};

    match store.config().data_path() {
        Some(path) if path.exists() => Ok(FileBackend::open(&path)?.size()?),
        _ => Ok(0),
    }
}
