use crate::paths;
use crate::traits::{
    page_entries, ListEntry, ListOptions, Storage, StorageError, StorageResult, UploadOptions,
};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use hearth_core::models::StoredObject;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectMeta, ObjectStoreExt, PutMode, PutOptions, PutPayload,
};
use std::sync::Arc;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn object_store::ObjectStore>,
    bucket: String,
    /// Base the bucket segment is appended to in public URLs.
    public_base_url: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - Optional base for public URLs; defaults to the endpoint,
    ///   or the regional AWS endpoint
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http)
                .with_virtual_hosted_style_request(false);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        // Path-style URLs keep the bucket name in the URL path.
        let public_base_url = public_base_url
            .or(endpoint_url)
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", region));

        Ok(S3Storage {
            store: Arc::new(store),
            bucket,
            public_base_url,
        })
    }

    /// Wrap any object store, e.g. `InMemory` in tests.
    pub fn with_store(
        store: Arc<dyn object_store::ObjectStore>,
        bucket: String,
        public_base_url: String,
    ) -> Self {
        S3Storage {
            store,
            bucket,
            public_base_url,
        }
    }

    fn location(path: &str) -> StorageResult<Path> {
        if !paths::validate_path(path) {
            return Err(StorageError::InvalidKey(path.to_string()));
        }
        Ok(Path::from(path))
    }

    /// Rename without replacing `to`.
    ///
    /// Buckets without conditional copy configured report `NotSupported`; those
    /// fall back to a head check on the target before an overwriting rename.
    async fn rename_no_clobber(&self, from: &Path, to: &Path) -> Result<(), ObjectStoreError> {
        match self.store.rename_if_not_exists(from, to).await {
            Err(ObjectStoreError::NotSupported { .. }) => match self.store.head(to).await {
                Ok(_) => Err(ObjectStoreError::AlreadyExists {
                    path: to.to_string(),
                    source: "target object exists".into(),
                }),
                Err(ObjectStoreError::NotFound { .. }) => self.store.rename(from, to).await,
                Err(e) => Err(e),
            },
            other => other,
        }
    }
}

/// Map a listed key onto `owner/filename`. Root-level and nested keys are not
/// image objects and yield `None`.
fn stored_object(meta: &ObjectMeta) -> Option<StoredObject> {
    let key = meta.location.as_ref();
    let (owner, filename) = key.split_once('/')?;
    if owner.is_empty() || filename.is_empty() || filename.contains('/') {
        return None;
    }
    Some(StoredObject {
        owner: owner.to_string(),
        filename: filename.to_string(),
        created_at: Some(meta.last_modified),
    })
}

#[async_trait]
impl Storage for S3Storage {
    async fn list(&self, prefix: &str, options: &ListOptions) -> StorageResult<Vec<ListEntry>> {
        let prefix = prefix.trim_end_matches('/');
        let location = if prefix.is_empty() {
            None
        } else {
            Some(Self::location(prefix)?)
        };
        let start = std::time::Instant::now();

        let listing = object_store::ObjectStore::list_with_delimiter(&self.store, location.as_ref())
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    prefix = %prefix,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 list failed"
                );
                StorageError::ListFailed(e.to_string())
            })?;

        let folders = listing
            .common_prefixes
            .iter()
            .filter_map(|p| p.filename().map(ListEntry::folder));
        let objects = listing.objects.iter().filter_map(|meta| {
            meta.location
                .filename()
                .map(|name| ListEntry::object(name, Some(meta.last_modified)))
        });
        let entries: Vec<ListEntry> = folders.chain(objects).collect();

        tracing::debug!(
            bucket = %self.bucket,
            prefix = %prefix,
            entries = entries.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 list successful"
        );

        Ok(page_entries(entries, options))
    }

    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<String> {
        let location = Self::location(path)?;
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, options.content_type.clone().into());
        if let Some(ref cache_control) = options.cache_control {
            attributes.insert(
                Attribute::CacheControl,
                format!("max-age={}", cache_control).into(),
            );
        }
        let put_options = PutOptions {
            mode: if options.upsert {
                PutMode::Overwrite
            } else {
                PutMode::Create
            },
            attributes,
            ..PutOptions::default()
        };

        let payload = PutPayload::from(data);
        object_store::ObjectStore::put_opts(&self.store, &location, payload, put_options)
            .await
            .map_err(|e| match e {
                ObjectStoreError::AlreadyExists { .. } => {
                    StorageError::AlreadyExists(path.to_string())
                }
                other => {
                    tracing::error!(
                        error = %other,
                        bucket = %self.bucket,
                        key = %path,
                        size_bytes = size,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 upload failed"
                    );
                    StorageError::UploadFailed(other.to_string())
                }
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(path.to_string())
    }

    async fn move_object(&self, from: &str, to: &str) -> StorageResult<()> {
        let from_location = Self::location(from)?;
        let to_location = Self::location(to)?;
        let start = std::time::Instant::now();

        // S3 has no native rename; this is copy-then-delete.
        self.rename_no_clobber(&from_location, &to_location)
            .await
            .map_err(|e| match e {
                ObjectStoreError::NotFound { .. } => StorageError::NotFound(from.to_string()),
                ObjectStoreError::AlreadyExists { .. } => {
                    StorageError::AlreadyExists(to.to_string())
                }
                other => {
                    tracing::error!(
                        error = %other,
                        bucket = %self.bucket,
                        from_key = %from,
                        to_key = %to,
                        "S3 move failed"
                    );
                    StorageError::MoveFailed(other.to_string())
                }
            })?;

        tracing::info!(
            bucket = %self.bucket,
            from_key = %from,
            to_key = %to,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 move successful"
        );

        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> StorageResult<()> {
        let locations = paths
            .iter()
            .map(|p| Self::location(p))
            .collect::<StorageResult<Vec<_>>>()?;
        let start = std::time::Instant::now();

        let count = locations.len();
        if count == 0 {
            return Ok(());
        }

        // One batched request per provider page; missing keys are not failures.
        let batch = futures::stream::iter(locations.into_iter().map(Ok)).boxed();
        let failures: Vec<ObjectStoreError> =
            object_store::ObjectStore::delete_stream(&self.store, batch)
                .filter_map(|result| async move {
                    match result {
                        Ok(_) | Err(ObjectStoreError::NotFound { .. }) => None,
                        Err(e) => Some(e),
                    }
                })
                .collect()
                .await;

        if let Some(e) = failures.into_iter().next() {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                count,
                "S3 delete failed"
            );
            return Err(StorageError::DeleteFailed(e.to_string()));
        }

        tracing::info!(
            bucket = %self.bucket,
            count,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 remove successful"
        );

        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        paths::public_url(&self.public_base_url, &self.bucket, path)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }

    /// S3 lists recursively, so the whole bucket is one listing. The client
    /// pages it at the provider's limit and `page_size` is not used.
    fn walk(&self, _page_size: usize) -> BoxStream<'_, StorageResult<StoredObject>> {
        object_store::ObjectStore::list(&self.store, None)
            .map_err(|e| StorageError::ListFailed(e.to_string()))
            .try_filter_map(|meta| async move { Ok(stored_object(&meta)) })
            .boxed()
    }
}
