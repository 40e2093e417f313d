//! Attachment records and their lifecycle.
//!
//! This module sequences the storage engine, the record store and the
//! permission checker:
//! - Upload: validate, store content, create the record
//! - Metadata retrieval
//! - Download authorisation and content resolution
//! - Deletion, content first and then the record

mod error;
mod presenter;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use error::AttachmentError;
pub use presenter::{AttachmentPresenter, AttachmentView, PresentationConfig};
pub use service::{AttachmentRepository, AttachmentService};
pub use types::{Attachment, CreateAttachmentInput, Download, UploadInput};
