//! Core attachment engine for Chewy.
//!
//! This crate contains the storage-and-access logic with ZERO web or
//! database dependencies. Adapters supply a record store through
//! [`attachment::AttachmentRepository`] and build a
//! [`permission::RequesterContext`] from whatever identity they trust.
//!
//! # Modules
//!
//! - `storage` - Durable byte storage under engine-assigned paths
//! - `permission` - Pure download and delete access decisions
//! - `attachment` - Attachment records, lifecycle orchestration and presentation

pub mod attachment;
pub mod permission;
pub mod storage;
