use crate::paths;
use crate::traits::{
    page_entries, ListEntry, ListOptions, Storage, StorageError, StorageResult, UploadOptions,
};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct MemoryObject {
    data: Bytes,
    content_type: Option<String>,
    created_at: DateTime<Utc>,
}

/// In-process object store for development and tests.
///
/// Clones share the same objects.
#[derive(Clone)]
pub struct MemoryStorage {
    objects: Arc<RwLock<BTreeMap<String, MemoryObject>>>,
    base_url: String,
    bucket: String,
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            objects: Arc::new(RwLock::new(BTreeMap::new())),
            base_url: base_url.into(),
            bucket: bucket.into(),
        }
    }

    /// Seed an object with an explicit creation time.
    pub async fn insert_object(&self, path: &str, data: Bytes, created_at: DateTime<Utc>) {
        self.objects.write().await.insert(
            path.to_string(),
            MemoryObject {
                data,
                content_type: None,
                created_at,
            },
        );
    }

    pub async fn get(&self, path: &str) -> Option<Bytes> {
        self.objects.read().await.get(path).map(|o| o.data.clone())
    }

    pub async fn content_type(&self, path: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(path)
            .and_then(|o| o.content_type.clone())
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.objects.read().await.contains_key(path)
    }

    /// All stored paths in lexical order.
    pub async fn paths(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }

    fn check_path(path: &str) -> StorageResult<()> {
        if paths::validate_path(path) {
            Ok(())
        } else {
            Err(StorageError::InvalidKey(path.to_string()))
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn list(&self, prefix: &str, options: &ListOptions) -> StorageResult<Vec<ListEntry>> {
        let prefix = prefix.trim_end_matches('/');
        let scope = if prefix.is_empty() {
            String::new()
        } else {
            format!("{}/", prefix)
        };

        let objects = self.objects.read().await;
        let mut folders = BTreeSet::new();
        let mut entries = Vec::new();
        for (path, object) in objects.range(scope.clone()..) {
            let Some(rest) = path.strip_prefix(&scope) else {
                break;
            };
            match rest.split_once('/') {
                Some((folder, _)) => {
                    folders.insert(folder.to_string());
                }
                None => entries.push(ListEntry::object(rest, Some(object.created_at))),
            }
        }
        entries.extend(folders.into_iter().map(ListEntry::folder));

        Ok(page_entries(entries, options))
    }

    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<String> {
        Self::check_path(path)?;
        let mut objects = self.objects.write().await;
        if !options.upsert && objects.contains_key(path) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        let size = data.len();
        objects.insert(
            path.to_string(),
            MemoryObject {
                data,
                content_type: Some(options.content_type.clone()),
                created_at: Utc::now(),
            },
        );

        tracing::debug!(key = %path, size_bytes = size, "Memory storage upload successful");
        Ok(path.to_string())
    }

    async fn move_object(&self, from: &str, to: &str) -> StorageResult<()> {
        Self::check_path(from)?;
        Self::check_path(to)?;
        let mut objects = self.objects.write().await;
        if objects.contains_key(to) {
            return Err(StorageError::AlreadyExists(to.to_string()));
        }
        let object = objects
            .remove(from)
            .ok_or_else(|| StorageError::NotFound(from.to_string()))?;
        objects.insert(to.to_string(), object);

        tracing::debug!(from_key = %from, to_key = %to, "Memory storage move successful");
        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> StorageResult<()> {
        for path in paths {
            Self::check_path(path)?;
        }
        let mut objects = self.objects.write().await;
        for path in paths {
            objects.remove(path);
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        paths::public_url(&self.base_url, &self.bucket, path)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
