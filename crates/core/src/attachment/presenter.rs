//! Client-facing rendering of attachment records.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::types::Attachment;

/// Rendering settings, fixed when the presenter is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationConfig {
    /// strftime pattern for `created_at`.
    pub datetime_format: String,
    /// Prefix for content links; `/files/{id}/content` is appended.
    pub content_url_prefix: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            content_url_prefix: "/api/attachments".to_string(),
        }
    }
}

/// Attachment as returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentView {
    /// Attachment ID.
    pub id: Uuid,
    /// Original filename.
    pub original_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Owner identifier.
    pub owner_id: String,
    /// Visibility.
    pub is_public: bool,
    /// Formatted creation time.
    pub created_at: String,
    /// Download link.
    pub content_url: String,
}

/// Turns records into views.
#[derive(Debug, Clone, Default)]
pub struct AttachmentPresenter {
    config: PresentationConfig,
}

impl AttachmentPresenter {
    /// Create a presenter.
    #[must_use]
    pub fn new(mut config: PresentationConfig) -> Self {
        let trimmed = config.content_url_prefix.trim_end_matches('/').len();
        config.content_url_prefix.truncate(trimmed);
        Self { config }
    }

    /// Download link for an attachment.
    #[must_use]
    pub fn content_url(&self, id: Uuid) -> String {
        format!("{}/files/{id}/content", self.config.content_url_prefix)
    }

    /// Format a timestamp, falling back to RFC 3339 for a bad pattern.
    fn format_timestamp(&self, timestamp: DateTime<Utc>) -> String {
        let mut out = String::new();
        if write!(out, "{}", timestamp.format(&self.config.datetime_format)).is_err() {
            return timestamp.to_rfc3339();
        }
        out
    }

    /// Render a record. The storage path is never exposed.
    #[must_use]
    pub fn present(&self, attachment: &Attachment) -> AttachmentView {
        AttachmentView {
            id: attachment.id,
            original_name: attachment.original_name.clone(),
            mime_type: attachment.mime_type.clone(),
            size: attachment.size,
            owner_id: attachment.owner_id.clone(),
            is_public: attachment.is_public,
            created_at: self.format_timestamp(attachment.created_at),
            content_url: self.content_url(attachment.id),
        }
    }
}
