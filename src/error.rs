//! Error type for content store operations.
//!
//! Commands and the server wrap these in `anyhow` or HTTP errors; callers
//! that need to tell a missing document apart from an I/O failure match on
//! [`StoreError`] directly.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure while listing or reading documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The path does not name a document in the store.
    #[error("document not found: {path}")]
    NotFound { path: String },

    /// The path cannot address a document (absolute, empty, or escapes the root).
    #[error("invalid document path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// The file exists but its bytes are not UTF-8.
    #[error("document is not valid UTF-8: {path}")]
    NotUtf8 { path: String },

    /// Reading a file or its metadata failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking the store root failed.
    #[error("failed to walk content store: {0}")]
    Walk(#[from] walkdir::Error),

    /// An include or exclude glob does not compile.
    #[error("invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),
}

impl StoreError {
    pub fn not_found(path: impl Into<String>) -> Self {
        StoreError::NotFound { path: path.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
