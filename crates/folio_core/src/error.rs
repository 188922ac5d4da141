//! Error types for Folio core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in Folio core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] folio_storage::StorageError),

    /// JSON codec error.
    #[error("codec error: {0}")]
    Codec(#[from] folio_codec::CodecError),

    /// A query, update, document or identifier has the wrong shape.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of what was wrong.
        message: String,
    },

    /// An inserted document reuses the `_id` of a live document.
    #[error("duplicate identifier: {id}")]
    DuplicateIdentifier {
        /// The colliding identifier.
        id: String,
    },

    /// The store is not configured for the requested operation.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the misconfiguration.
        message: String,
    },

    /// Strict mode hit data that could not be parsed or serialized.
    #[error("corruption: {message}")]
    Corruption {
        /// Description of the corruption.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a duplicate identifier error.
    pub fn duplicate_identifier(id: impl Into<String>) -> Self {
        Self::DuplicateIdentifier { id: id.into() }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a corruption error.
    pub fn corruption(message: impl Into<String>) -> Self {
        Self::Corruption {
            message: message.into(),
        }
    }
}
