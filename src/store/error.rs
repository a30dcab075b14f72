//! Error types for the field store

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// No layout record has been saved yet
    #[error("layout not found")]
    LayoutNotFound,

    /// No record stored under the key
    #[error("record not found: {key}")]
    NotFound { key: String },

    /// Record exists but has the wrong shape
    #[error("record '{key}' is not {expected}")]
    InvalidRecord { key: String, expected: String },

    /// Backing file could not be read or written
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or decoded
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A previous operation panicked while holding the store lock
    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Create a not found error for a key
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an invalid record error
    pub fn invalid_record(key: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidRecord {
            key: key.into(),
            expected: expected.into(),
        }
    }

    /// Whether this error means the data is simply absent
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::LayoutNotFound | Self::NotFound { .. })
    }
}
