//! Hearth Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the Hearth image lifecycle crates: entity types, the storage path model,
//! caller identity, and environment-driven settings.

pub mod config;
pub mod constants;
pub mod error;
pub mod identity;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::AppError;
pub use identity::{Identity, IdentityProvider, StaticIdentity};
pub use models::{EntityType, StoragePath};
pub use storage_types::StorageBackend;
