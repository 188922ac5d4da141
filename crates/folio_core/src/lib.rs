//! # Folio Core
//!
//! Embedded document store engine for Folio.
//!
//! This crate provides:
//! - Document model validation (field-name legality, modifier detection)
//! - A query engine over dot-path field references and `$` operators
//! - A modifier engine for `$set`, `$add` and `$push` updates
//! - Result projection
//! - [`Store`], an in-memory table with tombstones and a JSON-line data file
//!
//! ## Usage
//!
//! ```
//! use folio_core::{Config, Projection, Store};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir()?;
//! let mut store = Store::open(Config::new().name("notes").root(dir.path()))?;
//! store.load()?;
//!
//! store.insert(json!([
//!     {"_id": "a", "count": 3, "tags": ["draft"]},
//!     {"_id": "b", "count": 1},
//! ]))?;
//! store.update_by_id("a", json!({"$add": {"count": 3}}), &Projection::all())?;
//! store.delete_by_id("b")?;
//! store.persist()?;
//!
//! let found = store.find(json!({"$gt": {"count": 5}}), &Projection::fields(["_id"]))?;
//! assert_eq!(found.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod id;
pub mod model;
mod mutation;
mod persistence;
mod projection;
pub mod query;
mod store;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use folio_codec::{Document, Value};
pub use id::{generate_id, wrap_in_sequence, Ids};
pub use model::ID_FIELD;
pub use mutation::{apply_modifiers, ModifierSet, Update};
pub use persistence::{LoadReport, PersistReport};
pub use projection::{project, Projection};
pub use query::{matches, FieldPath, Query};
pub use store::Store;
