//! Attachment error types.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// Attachment operation errors.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// Upload input rejected before anything was stored.
    #[error("validation error: {0}")]
    Validation(String),

    /// Attachment record not found.
    #[error("attachment not found: {0}")]
    NotFound(Uuid),

    /// Record exists but its stored content is gone.
    #[error("content missing for attachment: {0}")]
    ContentNotFound(Uuid),

    /// Requester may not access the attachment.
    #[error("permission denied for attachment: {0}")]
    PermissionDenied(Uuid),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl AttachmentError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// True when either the record or its content is absent.
    ///
    /// Callers facing clients should not tell the two apart.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::ContentNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found_merges_record_and_content() {
        let id = Uuid::new_v4();
        assert!(AttachmentError::NotFound(id).is_not_found());
        assert!(AttachmentError::ContentNotFound(id).is_not_found());
        assert!(!AttachmentError::PermissionDenied(id).is_not_found());
        assert!(!AttachmentError::Storage(StorageError::not_found("x")).is_not_found());
    }
}
