//! Temporary image lifecycle.
//!
//! Uploads land under `{owner}/temp-upload-...` and stay there until the owning
//! entity exists, at which point [`ImageLifecycle::commit_image_urls`] moves them
//! to entity-scoped permanent paths. Whatever is abandoned is collected by the
//! cleanup operations.

mod cleanup;
mod commit;
mod error;
mod upload;

use std::sync::Arc;

use hearth_core::constants::{DEFAULT_LIST_PAGE_SIZE, DEFAULT_MAX_IMAGE_SIZE_BYTES};
use hearth_core::Config;
use hearth_db::EntityLookup;
use hearth_storage::Storage;

pub use error::ImageError;
pub use upload::ImageFile;

/// Limits applied by the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSettings {
    pub max_file_size: usize,
    pub list_page_size: usize,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_IMAGE_SIZE_BYTES,
            list_page_size: DEFAULT_LIST_PAGE_SIZE,
        }
    }
}

impl ImageSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_file_size: config.max_image_size_bytes,
            list_page_size: config.list_page_size,
        }
    }
}

/// Upload, commit and cleanup of images in one bucket.
#[derive(Clone)]
pub struct ImageLifecycle {
    storage: Arc<dyn Storage>,
    entities: Arc<dyn EntityLookup>,
    settings: ImageSettings,
}

impl ImageLifecycle {
    pub fn new(
        storage: Arc<dyn Storage>,
        entities: Arc<dyn EntityLookup>,
        settings: ImageSettings,
    ) -> Self {
        Self {
            storage,
            entities,
            settings,
        }
    }
}
