use hearth_core::models::is_temporary;
use hearth_core::{EntityType, StoragePath};
use hearth_storage::paths::extract_path;

use super::{ImageError, ImageLifecycle};

impl ImageLifecycle {
    /// Make every temporary image in `urls` permanent under the given entity.
    ///
    /// Returns the final URLs in input order. URLs that do not decode to a
    /// bucket path are dropped; permanent URLs are returned unchanged. Files are
    /// moved one at a time and the first failed move aborts the batch, leaving
    /// earlier moves in place.
    #[tracing::instrument(
        skip(self, urls),
        fields(urls = urls.len(), entity_type = %entity_type, entity_id = %entity_id)
    )]
    pub async fn commit_image_urls(
        &self,
        urls: &[String],
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<String>, ImageError> {
        if entity_id.is_empty() || entity_id.contains('/') {
            return Err(ImageError::InvalidEntityId(entity_id.to_string()));
        }

        let bucket = self.storage.bucket();
        let mut committed = Vec::with_capacity(urls.len());

        for url in urls {
            let Some(path) = extract_path(url, bucket) else {
                tracing::warn!(
                    url = %url,
                    bucket = %bucket,
                    "Skipping image URL outside the bucket"
                );
                continue;
            };

            if !is_temporary(&path) {
                committed.push(url.clone());
                continue;
            }

            let Some(target) = StoragePath::parse(&path)
                .and_then(|source| source.committed_to(entity_type, entity_id))
            else {
                tracing::warn!(path = %path, "Skipping unparseable temporary image path");
                continue;
            };
            let target = target.to_string();

            self.storage
                .move_object(&path, &target)
                .await
                .map_err(|source| {
                    tracing::error!(
                        error = %source,
                        from = %path,
                        to = %target,
                        "Image commit failed"
                    );
                    ImageError::CommitFailed {
                        path: path.clone(),
                        source,
                    }
                })?;

            tracing::debug!(from = %path, to = %target, "Image committed");
            committed.push(self.storage.public_url(&target));
        }

        Ok(committed)
    }
}
