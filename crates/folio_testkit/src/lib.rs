//! # Folio Testkit
//!
//! Test utilities for Folio.
//!
//! This crate provides:
//! - Test fixtures and store helpers
//! - Property-based test generators using proptest
//! - Query and update test vectors
//! - Test logging setup
//!
//! ## Usage
//!
//! ```rust
//! use folio_testkit::prelude::*;
//!
//! with_temp_store(|store| {
//!     store.insert(sample_documents()).unwrap();
//!     assert_eq!(store.count(), 3);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod logging;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use logging::*;
pub use vectors::*;
