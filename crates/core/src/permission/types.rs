//! Inputs to access decisions.

use serde::{Deserialize, Serialize};

/// Ownership and visibility of a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Identifier of the uploading requester.
    pub owner_id: String,
    /// Whether anyone may download the file.
    pub is_public: bool,
}

impl FileMetadata {
    /// Create file metadata.
    #[must_use]
    pub fn new(owner_id: impl Into<String>, is_public: bool) -> Self {
        Self {
            owner_id: owner_id.into(),
            is_public,
        }
    }
}

/// Who is asking.
///
/// An empty identifier is treated as anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequesterContext {
    user_id: Option<String>,
    is_trusted: bool,
}

impl RequesterContext {
    /// Build a context, normalising an empty identifier to anonymous.
    #[must_use]
    pub fn new(user_id: Option<String>, is_trusted: bool) -> Self {
        Self {
            user_id: user_id.filter(|id| !id.is_empty()),
            is_trusted,
        }
    }

    /// A requester with no identity.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An ordinary authenticated user.
    #[must_use]
    pub fn user(user_id: impl Into<String>) -> Self {
        Self::new(Some(user_id.into()), false)
    }

    /// A trusted internal caller.
    #[must_use]
    pub fn trusted(user_id: impl Into<String>) -> Self {
        Self::new(Some(user_id.into()), true)
    }

    /// The requester's identifier, if authenticated.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Whether the requester is a trusted internal caller.
    #[must_use]
    pub const fn is_trusted(&self) -> bool {
        self.is_trusted
    }

    /// Whether the requester has no identity.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }
}
