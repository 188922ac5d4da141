//! # Folio Codec
//!
//! Document value model and JSON-line encoding for Folio.
//!
//! This crate provides:
//! - [`Value`], the tagged union every field holds
//! - [`Document`], an insertion-ordered field map with order-insensitive equality
//! - A one-document-per-line JSON codec used by the data file
//!
//! ## Usage
//!
//! ```
//! use folio_codec::{from_json_line, to_json_line, Document, Value};
//!
//! let mut doc = Document::new();
//! doc.insert("_id", "a1");
//! doc.insert("count", 3);
//!
//! let line = to_json_line(&doc).unwrap();
//! assert_eq!(line, r#"{"_id":"a1","count":3}"#);
//!
//! let decoded = from_json_line(&line).unwrap();
//! assert_eq!(decoded.get("count"), Some(&Value::Number(3.0)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod json;
mod value;

pub use document::Document;
pub use error::{CodecError, CodecResult};
pub use json::{from_json_line, parse_value, to_json_line};
pub use value::Value;
