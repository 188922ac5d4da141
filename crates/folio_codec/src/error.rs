//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to encode a document as JSON text.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode JSON text.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },

    /// NaN and infinite numbers have no JSON representation.
    #[error("non-finite number in field `{field}`")]
    NonFiniteNumber {
        /// Dot-path of the offending field.
        field: String,
    },

    /// A line decoded to something other than a document.
    #[error("expected a document, found {type_name}")]
    NotADocument {
        /// Name of the type that was found.
        type_name: &'static str,
    },
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }

    /// Create a non-finite number error.
    pub fn non_finite(field: impl Into<String>) -> Self {
        Self::NonFiniteNumber {
            field: field.into(),
        }
    }
}
