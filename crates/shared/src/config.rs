//! Application configuration management.

use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Attachment storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Attachment presentation configuration.
    #[serde(default)]
    pub attachment: AttachmentSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL (`postgres://...` or `sqlite://...`).
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for verifying tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Which backing store holds attachment content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Local filesystem under `storage.root`.
    #[default]
    Local,
    /// S3-compatible object storage configured by `storage.s3`.
    S3,
}

/// S3-compatible object storage credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Settings {
    /// S3 endpoint URL.
    pub endpoint: String,
    /// Bucket name.
    pub bucket: String,
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Region.
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "auto".to_string()
}

/// Attachment storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backing store kind.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for the local backend.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed MIME types; empty accepts any type.
    #[serde(default)]
    pub allowed_mime_types: Vec<String>,
    /// S3 settings, required when `backend = "s3"`.
    #[serde(default)]
    pub s3: Option<S3Settings>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: default_storage_root(),
            max_file_size: default_max_file_size(),
            allowed_mime_types: Vec::new(),
            s3: None,
        }
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("media/attachments")
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

/// How attachment records are rendered to API clients.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentSettings {
    /// strftime pattern for `created_at`.
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
    /// Prefix prepended to `/files/{id}/content` when building download links.
    #[serde(default = "default_content_url_prefix")]
    pub content_url_prefix: String,
}

impl Default for AttachmentSettings {
    fn default() -> Self {
        Self {
            datetime_format: default_datetime_format(),
            content_url_prefix: default_content_url_prefix(),
        }
    }
}

fn default_datetime_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_content_url_prefix() -> String {
    "/api/attachments".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CHEWY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
