use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{Duration, Utc};
use futures::TryStreamExt;
use hearth_core::constants::DEFAULT_TEMP_MAX_AGE_HOURS;
use hearth_core::models::{is_temporary, StoredObject};
use hearth_core::{EntityType, StoragePath};

use super::{ImageError, ImageLifecycle};

impl ImageLifecycle {
    /// Delete temporary images created more than `max_age_hours` ago
    /// (24 when `None`). Returns how many were deleted.
    #[tracing::instrument(skip(self), fields(cleanup.operation = "temp_images"))]
    pub async fn cleanup_temp_images(
        &self,
        max_age_hours: Option<u32>,
    ) -> Result<usize, ImageError> {
        let hours = max_age_hours.unwrap_or(DEFAULT_TEMP_MAX_AGE_HOURS);
        let cutoff = Utc::now() - Duration::hours(i64::from(hours));

        let stale: Vec<String> = self
            .list_objects()
            .await?
            .into_iter()
            .filter(|object| {
                is_temporary(&object.filename) && object.created_before(cutoff)
            })
            .map(|object| object.path())
            .collect();

        self.remove_all(&stale).await?;

        tracing::info!(
            deleted = stale.len(),
            max_age_hours = hours,
            cutoff = %cutoff,
            "Temporary image cleanup finished"
        );
        Ok(stale.len())
    }

    /// Delete every permanent image of an entity that has just been deleted.
    #[tracing::instrument(skip(self), fields(cleanup.operation = "entity_images"))]
    pub async fn cleanup_entity_images(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<usize, ImageError> {
        if entity_id.is_empty() {
            return Err(ImageError::InvalidEntityId(entity_id.to_string()));
        }

        let owned: Vec<String> = self
            .list_objects()
            .await?
            .into_iter()
            .map(|object| object.path())
            .filter(|path| {
                StoragePath::parse(path)
                    .is_some_and(|parsed| parsed.belongs_to(entity_type, entity_id))
            })
            .collect();

        self.remove_all(&owned).await?;

        tracing::info!(deleted = owned.len(), "Entity image cleanup finished");
        Ok(owned.len())
    }

    /// Find permanent images whose entity no longer exists, deleting them
    /// unless `dry_run` is set.
    ///
    /// Names that do not parse or carry an unknown entity type are never
    /// reported, and neither are images whose lookup failed.
    #[tracing::instrument(skip(self), fields(cleanup.operation = "orphans"))]
    pub async fn find_orphaned_images(&self, dry_run: bool) -> Result<Vec<String>, ImageError> {
        let objects = self.list_objects().await?;
        let mut known: HashMap<(EntityType, String), bool> = HashMap::new();
        let mut orphans = Vec::new();
        let mut skipped = 0usize;

        for object in &objects {
            let path = object.path();
            let (entity_type, entity_id) = match StoragePath::parse(&path) {
                Some(StoragePath::Permanent {
                    entity_type,
                    entity_id,
                    ..
                }) => (entity_type, entity_id),
                Some(StoragePath::Temporary { .. }) => continue,
                Some(StoragePath::Foreign { .. }) | None => {
                    tracing::debug!(path = %path, "Skipping image with unrecognised name");
                    skipped += 1;
                    continue;
                }
            };

            let exists = match known.entry((entity_type, entity_id)) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let lookup = self.entities.exists(entity_type, &entry.key().1).await;
                    match lookup {
                        Ok(exists) => *entry.insert(exists),
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                code = e.error_code(),
                                path = %path,
                                "Entity lookup failed, keeping image"
                            );
                            continue;
                        }
                    }
                }
            };

            if !exists {
                orphans.push(path);
            }
        }

        if !dry_run {
            self.remove_all(&orphans).await?;
        }

        tracing::info!(
            scanned = objects.len(),
            orphans = orphans.len(),
            skipped,
            dry_run,
            "Orphaned image scan finished"
        );
        Ok(orphans)
    }

    async fn list_objects(&self) -> Result<Vec<StoredObject>, ImageError> {
        self.storage
            .walk(self.settings.list_page_size)
            .try_collect()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.storage.bucket(),
                    "Image listing failed"
                );
                ImageError::ListingFailed(e)
            })
    }

    /// One `remove` call for the whole set; none when it is empty.
    async fn remove_all(&self, paths: &[String]) -> Result<(), ImageError> {
        if paths.is_empty() {
            return Ok(());
        }
        self.storage.remove(paths).await.map_err(|e| {
            tracing::error!(error = %e, count = paths.len(), "Image deletion failed");
            ImageError::DeletionFailed(e)
        })
    }
}
