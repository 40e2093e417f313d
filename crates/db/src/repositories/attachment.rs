//! Attachment repository for database operations.
//!
//! Implements the core attachment record store using SeaORM.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::entities::attachments;
use chewy_core::attachment::{
    Attachment, AttachmentError, AttachmentRepository as AttachmentRepoTrait,
    CreateAttachmentInput,
};

/// Attachment repository implementation.
#[derive(Debug, Clone)]
pub struct AttachmentRepository {
    db: DatabaseConnection,
}

impl AttachmentRepository {
    /// Create a new attachment repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl AttachmentRepoTrait for AttachmentRepository {
    async fn create(&self, input: CreateAttachmentInput) -> Result<Attachment, AttachmentError> {
        let active_model = attachments::ActiveModel {
            id: Set(input.id),
            original_name: Set(input.original_name),
            storage_path: Set(input.storage_path),
            mime_type: Set(input.mime_type),
            size: Set(input.size),
            owner_id: Set(input.owner_id),
            is_public: Set(input.is_public),
            created_at: Set(input.created_at),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Attachment>, AttachmentError> {
        let model = attachments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AttachmentError> {
        let result = attachments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain model.
fn to_domain(model: attachments::Model) -> Attachment {
    Attachment {
        id: model.id,
        original_name: model.original_name,
        storage_path: model.storage_path,
        mime_type: model.mime_type,
        size: model.size,
        owner_id: model.owner_id,
        is_public: model.is_public,
        created_at: model.created_at,
    }
}
