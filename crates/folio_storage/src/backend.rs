//! Storage backend trait definition.

use crate::error::{StorageError, StorageResult};

/// A low-level storage backend for Folio.
///
/// Storage backends are **opaque byte stores**. Folio keeps its whole table
/// in memory and writes the data file wholesale, so a backend only needs to
/// hand back everything it holds and to swap that content out atomically.
///
/// # Invariants
///
/// - `read_at` returns exactly the bytes last written at that offset
/// - after `replace` returns, `read_all` yields exactly the new content
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The offset is beyond the current size
    /// - The read would extend beyond the current size
    /// - An I/O error occurs
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>>;

    /// Reads the entire content of the storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the content does not fit in memory or an I/O
    /// error occurs.
    fn read_all(&self) -> StorageResult<Vec<u8>> {
        let size = self.size()?;
        let len = usize::try_from(size).map_err(|_| StorageError::TooLarge { size })?;
        self.read_at(0, len)
    }

    /// Replaces the entire content of the storage with `data`.
    ///
    /// Either the old content or the new content is observable afterwards,
    /// never a mix of both.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs. On error the previous
    /// content is left in place.
    fn replace(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Flushes all pending writes to the operating system.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Returns the current size of the storage in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Syncs all data and metadata to durable storage.
    ///
    /// This is a stronger guarantee than `flush` - it ensures that
    /// file metadata (size, timestamps) is also durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;
}
