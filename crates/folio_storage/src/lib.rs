//! # Folio Storage
//!
//! Storage backend trait and implementations for Folio.
//!
//! Storage backends are **opaque byte stores** - they do not interpret
//! the data they store. The data file format (one JSON document per line)
//! is owned entirely by `folio_core`.
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral storage
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use folio_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.replace(b"hello world").unwrap();
//! assert_eq!(backend.read_all().unwrap(), b"hello world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
