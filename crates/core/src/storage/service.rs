//! Storage service implementation using Apache OpenDAL.

use std::path::PathBuf;
use std::time::Instant;

use bytes::Bytes;
use chrono::{Datelike, Utc};
use opendal::{Operator, services};
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use super::mime::detect_mime_type;

/// Result of persisting an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageDescriptor {
    /// Engine-assigned path, relative to the storage root.
    pub storage_path: String,
    /// Detected content type.
    pub mime_type: String,
    /// Number of bytes persisted.
    pub size: u64,
}

/// A stored file resolved for reading.
#[derive(Debug, Clone)]
pub struct FileLocation {
    /// Engine-assigned path, relative to the storage root.
    pub storage_path: String,
    /// Current size of the stored content.
    pub size: u64,
    /// Absolute filesystem path, for filesystem backends only.
    pub local_path: Option<PathBuf>,
}

/// Storage service for file attachments.
#[derive(Debug)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
    local_root: Option<PathBuf>,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let local_root = match &config.provider {
            StorageProvider::LocalFs { root } => Some(
                std::path::absolute(root)
                    .map_err(|e| StorageError::configuration(format!("invalid root: {e}")))?,
            ),
            StorageProvider::S3 { .. } => None,
        };
        let operator = Self::create_operator(&config.provider, local_root.as_deref())?;

        tracing::info!(
            provider = config.provider.name(),
            max_file_size = config.max_file_size,
            "Storage engine ready"
        );

        Ok(Self {
            operator,
            config,
            local_root,
        })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(
        provider: &StorageProvider,
        local_root: Option<&std::path::Path>,
    ) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let root = local_root.unwrap_or(root);
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Validate an upload against the configured limits.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is not accepted.
    pub fn validate_upload(&self, mime_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(mime_type) {
            return Err(StorageError::invalid_mime_type(mime_type));
        }

        Ok(())
    }

    /// Generate a fresh storage path.
    ///
    /// Format: `{yyyy}/{mm}/{dd}/{token}`. The token is a random UUID in
    /// simple form, so no part of a client filename ever reaches the path.
    #[must_use]
    pub fn generate_storage_path() -> String {
        let today = Utc::now().date_naive();
        format!(
            "{:04}/{:02}/{:02}/{}",
            today.year(),
            today.month(),
            today.day(),
            Uuid::new_v4().simple()
        )
    }

    /// Persist `content` under a new engine-assigned path.
    ///
    /// `original_name` is used only for MIME detection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::WriteFailure` if the backing medium rejects
    /// the write. Nothing is left behind in that case.
    pub async fn save_file(
        &self,
        content: Bytes,
        original_name: &str,
    ) -> Result<StorageDescriptor, StorageError> {
        let start = Instant::now();
        let storage_path = Self::generate_storage_path();
        let mime_type = detect_mime_type(original_name, &content);
        let size = content.len() as u64;

        self.operator
            .write(&storage_path, content)
            .await
            .map_err(|e| {
                tracing::error!(path = %storage_path, error = %e, "Failed to write file");
                StorageError::write_failure(e.to_string())
            })?;

        tracing::info!(
            path = %storage_path,
            mime_type = %mime_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis(),
            "File stored"
        );

        Ok(StorageDescriptor {
            storage_path,
            mime_type,
            size,
        })
    }

    /// Resolve a storage path to a readable location.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the path is malformed or no
    /// content exists under it.
    pub async fn get_file_path(&self, storage_path: &str) -> Result<FileLocation, StorageError> {
        if !is_valid_storage_path(storage_path) {
            return Err(StorageError::not_found(storage_path));
        }

        let meta = self
            .operator
            .stat(storage_path)
            .await
            .map_err(StorageError::from)?;
        if !meta.is_file() {
            return Err(StorageError::not_found(storage_path));
        }

        Ok(FileLocation {
            storage_path: storage_path.to_string(),
            size: meta.content_length(),
            local_path: self.local_root.as_ref().map(|root| root.join(storage_path)),
        })
    }

    /// Read stored content into memory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the path is malformed or no
    /// content exists under it.
    pub async fn read_file(&self, storage_path: &str) -> Result<Bytes, StorageError> {
        let location = self.get_file_path(storage_path).await?;
        let buffer = self
            .operator
            .read(&location.storage_path)
            .await
            .map_err(StorageError::from)?;
        Ok(buffer.to_bytes())
    }

    /// Delete stored content. Deleting an absent path succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` for a malformed path, or an
    /// operation error if the backing store fails.
    pub async fn delete_file(&self, storage_path: &str) -> Result<(), StorageError> {
        if !is_valid_storage_path(storage_path) {
            return Err(StorageError::InvalidPath(storage_path.to_string()));
        }

        match self.operator.delete(storage_path).await {
            Ok(()) => {
                tracing::info!(path = %storage_path, "File deleted");
                Ok(())
            }
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Whether `path` is a relative path made only of plain segments.
fn is_valid_storage_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    // Saved content reads back byte-for-byte, whatever the name.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn prop_save_then_read_roundtrip(
            content in proptest::collection::vec(any::<u8>(), 0..4096),
            name in ".{0,40}",
        ) {
            let dir = tempfile::tempdir().unwrap();
            let service = StorageService::from_config(
                StorageConfig::new(StorageProvider::local_fs(dir.path())),
            ).unwrap();

            let rt = runtime();
            let (descriptor, read_back) = rt.block_on(async {
                let descriptor = service
                    .save_file(Bytes::from(content.clone()), &name)
                    .await
                    .unwrap();
                let read_back = service.read_file(&descriptor.storage_path).await.unwrap();
                (descriptor, read_back)
            });

            prop_assert_eq!(descriptor.size, content.len() as u64);
            prop_assert_eq!(&read_back[..], &content[..]);
            prop_assert!(is_valid_storage_path(&descriptor.storage_path));
        }
    }

    // Any name, however hostile, yields a path made of the date and a token.
    proptest! {
        #[test]
        fn prop_storage_path_has_no_client_segments(name in ".*") {
            let dir = tempfile::tempdir().unwrap();
            let service = StorageService::from_config(
                StorageConfig::new(StorageProvider::local_fs(dir.path())),
            ).unwrap();

            let descriptor = runtime()
                .block_on(service.save_file(Bytes::from_static(b"x"), &name))
                .unwrap();

            let parts: Vec<&str> = descriptor.storage_path.split('/').collect();
            prop_assert_eq!(parts.len(), 4);
            prop_assert!(parts.iter().all(|p| p.chars().all(|c| c.is_ascii_hexdigit())));
        }
    }

    // Paths never repeat, even for the same name.
    proptest! {
        #[test]
        fn prop_storage_paths_are_unique(count in 2usize..200) {
            let mut seen = std::collections::HashSet::new();
            for _ in 0..count {
                prop_assert!(seen.insert(StorageService::generate_storage_path()));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_file_size_validation(
            max_size in 1024u64..10_000_000,
            file_size in 0u64..20_000_000,
        ) {
            let dir = tempfile::tempdir().unwrap();
            let service = StorageService::from_config(
                StorageConfig::new(StorageProvider::local_fs(dir.path()))
                    .with_max_file_size(max_size),
            ).unwrap();

            let result = service.validate_upload("application/pdf", file_size);

            if file_size <= max_size {
                prop_assert!(result.is_ok());
            } else {
                let is_too_large = matches!(result, Err(StorageError::FileTooLarge { .. }));
                prop_assert!(is_too_large, "Expected FileTooLarge error");
            }
        }
    }
}
