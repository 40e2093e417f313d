//! Permission checker.

use super::types::{FileMetadata, RequesterContext};

/// Stateless access decisions for stored files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionChecker;

impl PermissionChecker {
    /// Decide whether `requester` may download the file.
    ///
    /// Public files are open to everyone, anonymous requesters included.
    /// Private files are open only to their owner. Trust does not widen
    /// download access.
    #[must_use]
    pub fn can_download(file: &FileMetadata, requester: &RequesterContext) -> bool {
        file.is_public || Self::is_owner(file, requester)
    }

    /// Decide whether `requester` may delete the file.
    ///
    /// Owners and trusted callers may delete; visibility is irrelevant.
    #[must_use]
    pub fn can_delete(file: &FileMetadata, requester: &RequesterContext) -> bool {
        requester.is_trusted() || Self::is_owner(file, requester)
    }

    fn is_owner(file: &FileMetadata, requester: &RequesterContext) -> bool {
        requester
            .user_id()
            .is_some_and(|id| id == file.owner_id)
    }
}
