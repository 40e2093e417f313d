//! Storage engine for attachment content using Apache OpenDAL.
//!
//! Bytes are written under engine-assigned paths of the form
//! `{yyyy}/{mm}/{dd}/{token}`; the client filename only feeds MIME
//! detection. Supported backends:
//! - Local filesystem
//! - S3-compatible object storage
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      StorageService                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ save_file(bytes, name)     │ get_file_path(path)                │
//! │ read_file(path)            │ delete_file(path)                  │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                 Apache OpenDAL Operator (fs / s3)               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod mime;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use mime::{DEFAULT_MIME_TYPE, detect_mime_type};
pub use service::{FileLocation, StorageDescriptor, StorageService};
