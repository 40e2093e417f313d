//! Attachment service implementation.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use super::error::AttachmentError;
use super::types::{Attachment, CreateAttachmentInput, Download, UploadInput};
use crate::permission::{PermissionChecker, RequesterContext};
use crate::storage::{StorageService, detect_mime_type};

/// Repository trait for attachment persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait AttachmentRepository: Send + Sync {
    /// Create a new attachment record.
    fn create(
        &self,
        input: CreateAttachmentInput,
    ) -> impl std::future::Future<Output = Result<Attachment, AttachmentError>> + Send;

    /// Find attachment by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Attachment>, AttachmentError>> + Send;

    /// Delete attachment by ID. Returns whether a record was removed.
    fn delete(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, AttachmentError>> + Send;
}

/// Attachment service sequencing storage, records and access checks.
pub struct AttachmentService<R: AttachmentRepository> {
    storage: Arc<StorageService>,
    repo: Arc<R>,
}

impl<R: AttachmentRepository> Clone for AttachmentService<R> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: AttachmentRepository> AttachmentService<R> {
    /// Create a new attachment service.
    #[must_use]
    pub fn new(storage: Arc<StorageService>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    /// Store uploaded content and create its record.
    ///
    /// The record is created only after the content is durably saved. If
    /// record creation then fails, the saved content is removed again on a
    /// best-effort basis and the repository error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The filename or owner is empty
    /// - File size exceeds the limit or the MIME type is not allowed
    /// - The content cannot be written
    /// - The record cannot be created
    pub async fn upload(&self, input: UploadInput) -> Result<Attachment, AttachmentError> {
        if input.original_name.trim().is_empty() {
            return Err(AttachmentError::validation("original_name is required"));
        }
        if input.owner_id.is_empty() {
            return Err(AttachmentError::validation("owner_id is required"));
        }

        let size = i64::try_from(input.content.len())
            .map_err(|_| AttachmentError::validation("file is too large"))?;
        let mime_type = detect_mime_type(&input.original_name, &input.content);
        self.storage
            .validate_upload(&mime_type, input.content.len() as u64)?;

        let descriptor = self
            .storage
            .save_file(input.content, &input.original_name)
            .await?;

        let create_input = CreateAttachmentInput {
            id: Uuid::new_v4(),
            original_name: input.original_name,
            storage_path: descriptor.storage_path.clone(),
            mime_type: descriptor.mime_type,
            size,
            owner_id: input.owner_id,
            is_public: input.is_public,
            // microseconds survive every supported database
            created_at: Utc::now().trunc_subsecs(6),
        };

        match self.repo.create(create_input).await {
            Ok(attachment) => {
                tracing::info!(
                    attachment_id = %attachment.id,
                    owner_id = %attachment.owner_id,
                    size_bytes = attachment.size,
                    is_public = attachment.is_public,
                    "Attachment uploaded"
                );
                Ok(attachment)
            }
            Err(err) => {
                if let Err(cleanup) = self.storage.delete_file(&descriptor.storage_path).await {
                    tracing::warn!(
                        path = %descriptor.storage_path,
                        error = %cleanup,
                        "Failed to remove content after record creation failed"
                    );
                }
                Err(err)
            }
        }
    }

    /// Get attachment metadata by ID.
    ///
    /// No permission check is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if attachment not found or database operation fails.
    pub async fn get(&self, attachment_id: Uuid) -> Result<Attachment, AttachmentError> {
        self.repo
            .find_by_id(attachment_id)
            .await?
            .ok_or(AttachmentError::NotFound(attachment_id))
    }

    /// Authorise a download and resolve where the content lives.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Attachment not found
    /// - Requester may not download it
    /// - The content is missing from storage
    pub async fn download(
        &self,
        attachment_id: Uuid,
        requester: &RequesterContext,
    ) -> Result<Download, AttachmentError> {
        let attachment = self.get(attachment_id).await?;

        if !PermissionChecker::can_download(&attachment.to_file_metadata(), requester) {
            tracing::warn!(
                attachment_id = %attachment_id,
                requester = requester.user_id().unwrap_or("anonymous"),
                "Download denied"
            );
            return Err(AttachmentError::PermissionDenied(attachment_id));
        }

        let location = self
            .storage
            .get_file_path(&attachment.storage_path)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    tracing::warn!(
                        attachment_id = %attachment_id,
                        path = %attachment.storage_path,
                        "Record exists but content is missing"
                    );
                    AttachmentError::ContentNotFound(attachment_id)
                } else {
                    AttachmentError::Storage(e)
                }
            })?;

        Ok(Download {
            attachment,
            location,
        })
    }

    /// Delete an attachment's content, then its record.
    ///
    /// Access control is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Attachment not found
    /// - Storage deletion fails (the record is then left untouched)
    /// - Database deletion fails
    pub async fn delete(&self, attachment_id: Uuid) -> Result<(), AttachmentError> {
        let attachment = self.get(attachment_id).await?;

        self.storage.delete_file(&attachment.storage_path).await?;

        if !self.repo.delete(attachment_id).await? {
            return Err(AttachmentError::NotFound(attachment_id));
        }

        tracing::info!(attachment_id = %attachment_id, "Attachment deleted");
        Ok(())
    }

    /// Get the storage engine.
    #[must_use]
    pub fn storage(&self) -> &StorageService {
        &self.storage
    }
}
