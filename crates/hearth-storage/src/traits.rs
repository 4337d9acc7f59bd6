//! Storage abstraction trait
//!
//! This module defines the Storage trait that all object store backends implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use hearth_core::constants::{DEFAULT_LIST_PAGE_SIZE, UPLOAD_CACHE_CONTROL};
use hearth_core::models::StoredObject;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Move failed: {0}")]
    MoveFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Name,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Paging and ordering for a single `list` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: usize,
    pub offset: usize,
    pub sort_by: SortColumn,
    pub order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_PAGE_SIZE,
            offset: 0,
            sort_by: SortColumn::Name,
            order: SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    Object,
}

/// One entry directly under a listed prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Name relative to the listed prefix (no slashes).
    pub name: String,
    pub kind: EntryKind,
    /// Folders carry no timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

impl ListEntry {
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Folder,
            created_at: None,
        }
    }

    pub fn object(name: impl Into<String>, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Object,
            created_at,
        }
    }
}

/// Sort and page a full listing the way `list` callers expect.
pub fn page_entries(mut entries: Vec<ListEntry>, options: &ListOptions) -> Vec<ListEntry> {
    match options.sort_by {
        SortColumn::Name => entries.sort_by(|a, b| a.name.cmp(&b.name)),
        SortColumn::CreatedAt => {
            entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)))
        }
    }
    if options.order == SortOrder::Desc {
        entries.reverse();
    }
    entries
        .into_iter()
        .skip(options.offset)
        .take(options.limit)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: String,
    pub cache_control: Option<String>,
    /// Overwrite an existing object at the same path instead of failing.
    pub upsert: bool,
}

impl UploadOptions {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            cache_control: Some(UPLOAD_CACHE_CONTROL.to_string()),
            upsert: false,
        }
    }
}

/// Object store abstraction
///
/// Every method operates on the single bucket the backend was created for.
/// Paths are bucket-relative: `{owner}/{filename}`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// List the folders and objects directly under `prefix` (`""` for the bucket root).
    /// A prefix that does not exist lists as empty.
    async fn list(&self, prefix: &str, options: &ListOptions) -> StorageResult<Vec<ListEntry>>;

    /// Store `data` at `path` and return the stored path.
    ///
    /// Fails with `AlreadyExists` when the path is taken and `options.upsert` is false.
    async fn upload(&self, path: &str, data: Bytes, options: &UploadOptions)
        -> StorageResult<String>;

    /// Move an object to a new path. Fails with `NotFound` if `from` does not
    /// exist and `AlreadyExists` if `to` is taken.
    async fn move_object(&self, from: &str, to: &str) -> StorageResult<()>;

    /// Delete objects. Paths that do not exist are ignored.
    async fn remove(&self, paths: &[String]) -> StorageResult<()>;

    /// Public URL for a path. Does not check that the object exists.
    fn public_url(&self, path: &str) -> String;

    /// Bucket name; it appears as a path segment in every public URL.
    fn bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Every object in the bucket as `(owner, filename, created_at)`.
    ///
    /// The default lists the root folders and then each folder, page by page.
    /// Backends with recursive listing override it.
    fn walk(&self, page_size: usize) -> BoxStream<'_, StorageResult<StoredObject>> {
        crate::walk::walk_folders(self, page_size)
    }
}
