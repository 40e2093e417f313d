//! Lifecycle tests for AttachmentService against an in-memory repository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tempfile::TempDir;
use uuid::Uuid;

use super::{
    Attachment, AttachmentError, AttachmentRepository, AttachmentService, CreateAttachmentInput,
    UploadInput,
};
use crate::permission::RequesterContext;
use crate::storage::{StorageConfig, StorageError, StorageProvider, StorageService};

/// Mock repository for testing.
#[derive(Default)]
struct MockAttachmentRepository {
    attachments: Mutex<HashMap<Uuid, Attachment>>,
    fail_create: AtomicBool,
}

impl MockAttachmentRepository {
    fn len(&self) -> usize {
        self.attachments.lock().unwrap().len()
    }
}

impl AttachmentRepository for MockAttachmentRepository {
    async fn create(&self, input: CreateAttachmentInput) -> Result<Attachment, AttachmentError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AttachmentError::repository("connection reset"));
        }
        let attachment = Attachment {
            id: input.id,
            original_name: input.original_name,
            storage_path: input.storage_path,
            mime_type: input.mime_type,
            size: input.size,
            owner_id: input.owner_id,
            is_public: input.is_public,
            created_at: input.created_at,
        };
        self.attachments
            .lock()
            .unwrap()
            .insert(attachment.id, attachment.clone());
        Ok(attachment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Attachment>, AttachmentError> {
        Ok(self.attachments.lock().unwrap().get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AttachmentError> {
        Ok(self.attachments.lock().unwrap().remove(&id).is_some())
    }
}

struct Fixture {
    dir: TempDir,
    repo: Arc<MockAttachmentRepository>,
    service: AttachmentService<MockAttachmentRepository>,
}

fn fixture_with(config: impl FnOnce(StorageConfig) -> StorageConfig) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageService::from_config(config(StorageConfig::new(
        StorageProvider::local_fs(dir.path()),
    )))
    .unwrap();
    let repo = Arc::new(MockAttachmentRepository::default());
    let service = AttachmentService::new(Arc::new(storage), Arc::clone(&repo));
    Fixture { dir, repo, service }
}

fn fixture() -> Fixture {
    fixture_with(|c| c)
}

fn upload(name: &str, content: &'static [u8], owner: &str, is_public: bool) -> UploadInput {
    UploadInput {
        original_name: name.to_string(),
        content: Bytes::from_static(content),
        owner_id: owner.to_string(),
        is_public,
    }
}

/// Count regular files below `root`.
fn stored_files(root: &std::path::Path) -> usize {
    let Ok(entries) = std::fs::read_dir(root) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() { stored_files(&path) } else { 1 }
        })
        .sum()
}

#[tokio::test]
async fn test_private_report_lifecycle() {
    let fx = fixture();

    let attachment = fx
        .service
        .upload(upload("report.pdf", b"0123456789", "u1", false))
        .await
        .unwrap();
    assert_eq!(attachment.size, 10);
    assert_eq!(attachment.mime_type, "application/pdf");
    assert_eq!(attachment.owner_id, "u1");
    assert!(!attachment.is_public);
    assert!(!attachment.storage_path.contains("report"));

    // owner can download
    let download = fx
        .service
        .download(attachment.id, &RequesterContext::user("u1"))
        .await
        .unwrap();
    assert_eq!(download.attachment, attachment);
    let bytes = fx
        .service
        .storage()
        .read_file(&download.location.storage_path)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"0123456789");

    // someone else cannot
    let err = fx
        .service
        .download(attachment.id, &RequesterContext::user("u2"))
        .await
        .unwrap_err();
    assert!(matches!(err, AttachmentError::PermissionDenied(id) if id == attachment.id));

    fx.service.delete(attachment.id).await.unwrap();

    let err = fx
        .service
        .download(attachment.id, &RequesterContext::user("u1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AttachmentError::NotFound(_)));
    assert_eq!(stored_files(fx.dir.path()), 0);
}

#[tokio::test]
async fn test_public_file_is_downloadable_anonymously() {
    let fx = fixture();

    let attachment = fx
        .service
        .upload(upload("logo.png", b"\x89PNG\r\n\x1a\n", "u1", true))
        .await
        .unwrap();

    let download = fx
        .service
        .download(attachment.id, &RequesterContext::anonymous())
        .await
        .unwrap();
    assert_eq!(download.location.size, 8);
    assert!(download.location.local_path.is_some());
}

#[tokio::test]
async fn test_private_file_denied_to_anonymous() {
    let fx = fixture();

    let attachment = fx
        .service
        .upload(upload("notes.txt", b"secret", "u1", false))
        .await
        .unwrap();

    let err = fx
        .service
        .download(attachment.id, &RequesterContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, AttachmentError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_get_round_trips_all_fields() {
    let fx = fixture();

    let created = fx
        .service
        .upload(upload("data.csv", b"a,b\n1,2\n", "u7", true))
        .await
        .unwrap();
    let fetched = fx.service.get(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.mime_type, "text/csv");
}

#[tokio::test]
async fn test_get_unknown_id() {
    let fx = fixture();

    let id = Uuid::new_v4();
    let err = fx.service.get(id).await.unwrap_err();
    assert!(matches!(err, AttachmentError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn test_empty_content_is_accepted() {
    let fx = fixture();

    let attachment = fx
        .service
        .upload(upload("empty.bin", b"", "u1", false))
        .await
        .unwrap();
    assert_eq!(attachment.size, 0);
}

#[tokio::test]
async fn test_upload_validation() {
    let fx = fixture();

    let err = fx
        .service
        .upload(upload("   ", b"x", "u1", false))
        .await
        .unwrap_err();
    assert!(matches!(err, AttachmentError::Validation(_)));

    let err = fx
        .service
        .upload(upload("a.txt", b"x", "", false))
        .await
        .unwrap_err();
    assert!(matches!(err, AttachmentError::Validation(_)));

    assert_eq!(fx.repo.len(), 0);
    assert_eq!(stored_files(fx.dir.path()), 0);
}

#[tokio::test]
async fn test_upload_limits() {
    let fx = fixture_with(|c| {
        c.with_max_file_size(4)
            .with_allowed_mime_types(vec!["text/plain".into()])
    });

    let err = fx
        .service
        .upload(upload("big.txt", b"12345", "u1", false))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AttachmentError::Storage(StorageError::FileTooLarge { size: 5, max: 4 })
    ));

    let err = fx
        .service
        .upload(upload("page.html", b"<p>", "u1", false))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AttachmentError::Storage(StorageError::InvalidMimeType { .. })
    ));

    assert_eq!(fx.repo.len(), 0);
    assert_eq!(stored_files(fx.dir.path()), 0);
}

#[tokio::test]
async fn test_write_failure_creates_no_record() {
    let fx = fixture();

    let root = fx.dir.path().to_path_buf();
    std::fs::remove_dir_all(&root).unwrap();
    std::fs::write(&root, b"not a directory").unwrap();

    let err = fx
        .service
        .upload(upload("report.pdf", b"0123456789", "u1", false))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AttachmentError::Storage(StorageError::WriteFailure(_))
    ));
    assert_eq!(fx.repo.len(), 0);

    std::fs::remove_file(&root).unwrap();
}

#[tokio::test]
async fn test_failed_record_creation_removes_content() {
    let fx = fixture();
    fx.repo.fail_create.store(true, Ordering::SeqCst);

    let err = fx
        .service
        .upload(upload("report.pdf", b"0123456789", "u1", false))
        .await
        .unwrap_err();

    assert!(matches!(err, AttachmentError::Repository(_)));
    assert_eq!(stored_files(fx.dir.path()), 0);
}

#[tokio::test]
async fn test_missing_content_is_content_not_found() {
    let fx = fixture();

    let attachment = fx
        .service
        .upload(upload("report.pdf", b"0123456789", "u1", true))
        .await
        .unwrap();
    fx.service
        .storage()
        .delete_file(&attachment.storage_path)
        .await
        .unwrap();

    let err = fx
        .service
        .download(attachment.id, &RequesterContext::user("u1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AttachmentError::ContentNotFound(_)));
    assert!(err.is_not_found());

    // the orphaned record can still be deleted
    fx.service.delete(attachment.id).await.unwrap();
    assert_eq!(fx.repo.len(), 0);
}

#[tokio::test]
async fn test_delete_unknown_id() {
    let fx = fixture();

    let err = fx.service.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AttachmentError::NotFound(_)));
}

#[tokio::test]
async fn test_same_name_gets_distinct_paths() {
    let fx = fixture();

    let mut paths = std::collections::HashSet::new();
    for _ in 0..20 {
        let attachment = fx
            .service
            .upload(upload("same.txt", b"x", "u1", false))
            .await
            .unwrap();
        assert!(paths.insert(attachment.storage_path));
    }
    assert_eq!(stored_files(fx.dir.path()), 20);
}
