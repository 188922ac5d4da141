//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// This backend provides persistent storage using OS file APIs.
/// Data survives process restarts.
///
/// # Durability
///
/// `replace()` writes the new content to a sibling `<file>.tmp`, syncs it,
/// renames it over the target and syncs the directory. A crash mid-write leaves either the old
/// file or the new one, never a truncated mix.
///
/// # Example
///
/// ```no_run
/// use folio_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("data.txt")).unwrap();
/// backend.replace(b"{\"_id\":\"a\"}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Opens or creates a file backend at the given path.
    ///
    /// If the file doesn't exist, a new empty file is created. No handle is
    /// kept open: every read goes to whatever file is at the path at that
    /// moment, so content replaced by another writer is picked up.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created.
    pub fn open(path: &Path) -> StorageResult<Self> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Opens or creates a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or file cannot be opened.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Syncs the parent directory so a rename into it is durable.
    #[cfg(unix)]
    fn sync_directory(&self) -> StorageResult<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        File::open(parent)?.sync_all()?;
        Ok(())
    }

    // NTFS journals metadata; directories cannot be opened for fsync.
    #[cfg(not(unix))]
    fn sync_directory(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        let size = file.metadata()?.len();
        let end = offset.saturating_add(len as u64);

        if offset > size || end > size {
            return Err(StorageError::ReadPastEnd { offset, len, size });
        }

        if len == 0 {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(offset))?;

        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;

        Ok(buffer)
    }

    fn read_all(&self) -> StorageResult<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        let size = file.metadata()?.len();
        let capacity = usize::try_from(size).map_err(|_| StorageError::TooLarge { size })?;

        let mut buffer = Vec::with_capacity(capacity);
        file.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let temp_path = self.temp_path();
        {
            let mut temp = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            temp.write_all(data)?;
            temp.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;
        self.sync_directory()?;

        Ok(())
    }

    fn flush(&mut self) -> StorageResult<()> {
        // Writes go straight to the file in `replace`
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    fn sync(&mut self) -> StorageResult<()> {
        let file = OpenOptions::new().write(true).open(&self.path)?;
        file.sync_all()?;
        Ok(())
    }
}
