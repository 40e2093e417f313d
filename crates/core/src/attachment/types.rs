//! Attachment types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permission::FileMetadata;
use crate::storage::FileLocation;

/// Attachment domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique identifier.
    pub id: Uuid,
    /// Client-supplied filename, for display only.
    pub original_name: String,
    /// Engine-assigned storage path.
    pub storage_path: String,
    /// MIME type detected at upload.
    pub mime_type: String,
    /// Size in bytes at upload.
    pub size: i64,
    /// Identifier of the uploader.
    pub owner_id: String,
    /// Whether anyone may download the content.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    /// Ownership and visibility, as consumed by the permission checker.
    #[must_use]
    pub fn to_file_metadata(&self) -> FileMetadata {
        FileMetadata::new(self.owner_id.clone(), self.is_public)
    }
}

/// Input for uploading a new attachment.
#[derive(Debug, Clone)]
pub struct UploadInput {
    /// Client-supplied filename.
    pub original_name: String,
    /// Raw content. May be empty.
    pub content: Bytes,
    /// Identifier of the uploader.
    pub owner_id: String,
    /// Requested visibility.
    pub is_public: bool,
}

/// Input for creating an attachment record.
#[derive(Debug, Clone)]
pub struct CreateAttachmentInput {
    /// Attachment ID.
    pub id: Uuid,
    /// Original filename.
    pub original_name: String,
    /// Storage path.
    pub storage_path: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Owner identifier.
    pub owner_id: String,
    /// Visibility.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An authorised download.
#[derive(Debug, Clone)]
pub struct Download {
    /// The attachment record.
    pub attachment: Attachment,
    /// Where to read the content from.
    pub location: FileLocation,
}
