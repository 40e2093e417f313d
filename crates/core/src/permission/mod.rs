//! Download and delete access decisions.
//!
//! Decisions are pure functions of the file's ownership and visibility and
//! the requester's identity. They perform no I/O.

mod checker;
mod types;

#[cfg(test)]
mod checker_props;

pub use checker::PermissionChecker;
pub use types::{FileMetadata, RequesterContext};
