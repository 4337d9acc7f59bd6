use crate::paths;
use crate::traits::{
    page_entries, ListEntry, ListOptions, Storage, StorageError, StorageResult, UploadOptions,
};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Objects live under `{base_path}/{bucket}/{path}`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    bucket: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for buckets (e.g., "/var/lib/hearth/storage")
    /// * `base_url` - Base URL the bucket is served under (e.g., "http://localhost:8000/storage")
    /// * `bucket` - Bucket name; becomes a directory under `base_path`
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        bucket: String,
    ) -> StorageResult<Self> {
        let base_path = base_path.into().join(&bucket);

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
            bucket,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys with traversal sequences that could escape the bucket directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if !paths::validate_path(storage_key) {
            return Err(StorageError::InvalidKey(format!(
                "Storage key contains invalid characters: {}",
                storage_key
            )));
        }

        let path = self.base_path.join(storage_key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Directory for a listing prefix; the bucket root for `""`.
    fn prefix_to_dir(&self, prefix: &str) -> StorageResult<PathBuf> {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            Ok(self.base_path.clone())
        } else {
            self.key_to_path(prefix)
        }
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn list(&self, prefix: &str, options: &ListOptions) -> StorageResult<Vec<ListEntry>> {
        let dir = self.prefix_to_dir(prefix)?;

        if !fs::try_exists(&dir).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let mut reader = fs::read_dir(&dir).await.map_err(|e| {
            StorageError::ListFailed(format!("Failed to read directory {}: {}", dir.display(), e))
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| {
            StorageError::ListFailed(format!("Failed to read directory {}: {}", dir.display(), e))
        })? {
            let Ok(name) = entry.file_name().into_string() else {
                tracing::warn!(dir = %dir.display(), "Skipping non UTF-8 file name");
                continue;
            };
            let metadata = entry.metadata().await.map_err(|e| {
                StorageError::ListFailed(format!("Failed to stat {}: {}", name, e))
            })?;

            if metadata.is_dir() {
                entries.push(ListEntry::folder(name));
            } else {
                let created_at = metadata
                    .created()
                    .or_else(|_| metadata.modified())
                    .ok()
                    .map(DateTime::<Utc>::from);
                entries.push(ListEntry::object(name, created_at));
            }
        }

        Ok(page_entries(entries, options))
    }

    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<String> {
        let file_path = self.key_to_path(path)?;
        let size = data.len();

        if !options.upsert && fs::try_exists(&file_path).await.unwrap_or(false) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }

        self.ensure_parent_dir(&file_path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&file_path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to sync file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %file_path.display(),
            key = %path,
            size_bytes = size,
            content_type = %options.content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(path.to_string())
    }

    async fn move_object(&self, from: &str, to: &str) -> StorageResult<()> {
        let from_path = self.key_to_path(from)?;
        let to_path = self.key_to_path(to)?;

        if !fs::try_exists(&from_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(from.to_string()));
        }
        if fs::try_exists(&to_path).await.unwrap_or(false) {
            return Err(StorageError::AlreadyExists(to.to_string()));
        }

        self.ensure_parent_dir(&to_path).await?;

        fs::rename(&from_path, &to_path).await.map_err(|e| {
            StorageError::MoveFailed(format!(
                "Failed to move {} to {}: {}",
                from_path.display(),
                to_path.display(),
                e
            ))
        })?;

        tracing::info!(
            from_key = %from,
            to_key = %to,
            "Local storage move successful"
        );

        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> StorageResult<()> {
        let file_paths = paths
            .iter()
            .map(|p| self.key_to_path(p))
            .collect::<StorageResult<Vec<_>>>()?;
        let start = std::time::Instant::now();

        for file_path in &file_paths {
            if !fs::try_exists(file_path).await.unwrap_or(false) {
                continue;
            }
            fs::remove_file(file_path).await.map_err(|e| {
                StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    file_path.display(),
                    e
                ))
            })?;
        }

        tracing::info!(
            count = file_paths.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage remove successful"
        );

        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        paths::public_url(&self.base_url, &self.bucket, path)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
