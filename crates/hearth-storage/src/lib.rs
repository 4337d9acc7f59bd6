//! Hearth Storage Library
//!
//! This crate provides the object store abstraction used by the image lifecycle:
//! the `Storage` trait, the URL/path codec, a bucket walker, and implementations
//! for S3-compatible stores, the local filesystem, and memory.
//!
//! # Path format
//!
//! All operations are relative to one configured bucket. Object paths are
//! `{owner}/{filename}`, where the owner is the uploading user's id. Paths must
//! not contain `..` or a leading `/`.
//!
//! Public URLs are path-style: `{base_url}/{bucket}/{path}`, with each path
//! segment percent-encoded, so `paths::extract_path` can recover the path.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod paths;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;
pub mod walk;

// Re-export commonly used types
pub use factory::create_storage;
pub use hearth_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{
    EntryKind, ListEntry, ListOptions, SortColumn, SortOrder, Storage, StorageError,
    StorageResult, UploadOptions,
};
