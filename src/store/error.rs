//! Key-value store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("store file I/O failed for {path}: {source}")]
    Io {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded as JSON.
    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        /// Key being written.
        key: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// A stored value could not be decoded into the requested type.
    #[error("failed to decode value for '{key}': {source}")]
    Decode {
        /// Key being read.
        key: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Returns true if this error comes from the filesystem.
    #[must_use]
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}
