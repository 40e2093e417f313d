//! Storage error types.

use thiserror::Error;

/// Failures of the storage engine.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Upload exceeds the configured size limit.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Upload content type is outside the allow-list.
    #[error("MIME type '{mime_type}' is not allowed")]
    InvalidMimeType {
        /// The rejected MIME type.
        mime_type: String,
    },

    /// The backing medium rejected the write. Nothing was stored.
    #[error("failed to write file: {0}")]
    WriteFailure(String),

    /// No content under the given path.
    #[error("no stored file at '{path}'")]
    NotFound {
        /// The storage path, or the backend's description of it.
        path: String,
    },

    /// The path could not have been assigned by the engine.
    #[error("invalid storage path: {0}")]
    InvalidPath(String),

    /// The engine could not be built from its configuration.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Any other backend failure.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create an invalid MIME type error.
    #[must_use]
    pub fn invalid_mime_type(mime_type: impl Into<String>) -> Self {
        Self::InvalidMimeType {
            mime_type: mime_type.into(),
        }
    }

    /// Create a write failure error.
    #[must_use]
    pub fn write_failure(msg: impl Into<String>) -> Self {
        Self::WriteFailure(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the content is absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::not_found(err.to_string()),
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::Operation(err.to_string()),
        }
    }
}
