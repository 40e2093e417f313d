//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use chewy_shared::{StorageBackend, StorageSettings};

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: AWS S3, Cloudflare R2, MinIO
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Local filesystem
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create S3-compatible provider.
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Short provider name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed MIME types for upload. Empty accepts every type.
    pub allowed_mime_types: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Create a new storage config with default limits.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Vec::new(),
        }
    }

    /// Build the engine configuration from application settings.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` when the S3 backend is selected
    /// without its credentials.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let provider = match settings.backend {
            StorageBackend::Local => StorageProvider::local_fs(settings.root.clone()),
            StorageBackend::S3 => {
                let s3 = settings.s3.as_ref().ok_or_else(|| {
                    StorageError::configuration("storage.backend is s3 but storage.s3 is missing")
                })?;
                StorageProvider::s3(
                    &s3.endpoint,
                    &s3.bucket,
                    &s3.access_key_id,
                    &s3.secret_access_key,
                    &s3.region,
                )
            }
        };

        Ok(Self::new(provider)
            .with_max_file_size(settings.max_file_size)
            .with_allowed_mime_types(settings.allowed_mime_types.clone()))
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set allowed MIME types.
    #[must_use]
    pub fn with_allowed_mime_types(mut self, types: Vec<String>) -> Self {
        self.allowed_mime_types = types;
        self
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.is_empty() || self.allowed_mime_types.iter().any(|t| t == mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chewy_shared::config::S3Settings;

    #[test]
    fn test_storage_provider_names() {
        let provider = StorageProvider::s3(
            "https://s3.example.com",
            "attachments",
            "access_key",
            "secret_key",
            "auto",
        );
        assert_eq!(provider.name(), "s3");
        assert_eq!(StorageProvider::local_fs("./storage").name(), "local");
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"));
        assert_eq!(config.max_file_size, StorageConfig::DEFAULT_MAX_FILE_SIZE);
        assert!(config.allowed_mime_types.is_empty());
        assert!(config.is_mime_type_allowed("application/x-executable"));
    }

    #[test]
    fn test_mime_allow_list() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"))
            .with_allowed_mime_types(vec!["application/pdf".into(), "image/png".into()]);
        assert!(config.is_mime_type_allowed("application/pdf"));
        assert!(config.is_mime_type_allowed("image/png"));
        assert!(!config.is_mime_type_allowed("text/html"));
    }

    #[test]
    fn test_from_settings_local() {
        let settings = StorageSettings {
            root: PathBuf::from("/srv/chewy"),
            max_file_size: 2048,
            ..StorageSettings::default()
        };
        let config = StorageConfig::from_settings(&settings).unwrap();

        assert!(matches!(config.provider, StorageProvider::LocalFs { ref root } if root == &PathBuf::from("/srv/chewy")));
        assert_eq!(config.max_file_size, 2048);
    }

    #[test]
    fn test_from_settings_s3_requires_credentials() {
        let mut settings = StorageSettings {
            backend: StorageBackend::S3,
            ..StorageSettings::default()
        };
        assert!(matches!(
            StorageConfig::from_settings(&settings),
            Err(StorageError::Configuration(_))
        ));

        settings.s3 = Some(S3Settings {
            endpoint: "http://localhost:9000".into(),
            bucket: "attachments".into(),
            access_key_id: "minio".into(),
            secret_access_key: "minio123".into(),
            region: "us-east-1".into(),
        });
        let config = StorageConfig::from_settings(&settings).unwrap();
        assert_eq!(config.provider.name(), "s3");
    }
}
