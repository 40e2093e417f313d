//! Shared configuration, errors, and identity types for Chewy.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - Bearer token claims and the JWT service that issues and verifies them

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;


pub use auth::Claims;
pub use config::{AppConfig, AttachmentSettings, StorageBackend, StorageSettings};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
