#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-memory")]
use crate::MemoryStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use hearth_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let bucket = config.storage_bucket.clone();

    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage = S3Storage::new(
                bucket,
                region,
                config.s3_endpoint.clone(),
                config.storage_public_url.clone(),
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.storage_public_url.clone().ok_or_else(|| {
                StorageError::ConfigError("STORAGE_PUBLIC_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url, bucket).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => {
            let base_url = config
                .storage_public_url
                .clone()
                .unwrap_or_else(|| "http://localhost".to_string());
            Ok(Arc::new(MemoryStorage::new(base_url, bucket)))
        }

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory storage backend not available (storage-memory feature not enabled)".to_string(),
        )),
    }
}
