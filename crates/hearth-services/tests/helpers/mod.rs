//! Test helpers: an in-memory bucket that records calls, an in-memory entity
//! table, and a lifecycle wired to both.
//!
//! Run from workspace root: `cargo test -p hearth-services`.

#![allow(dead_code)]

pub mod entities;
pub mod fixtures;
pub mod storage;

use entities::TestEntities;
use hearth_services::{ImageLifecycle, ImageSettings};
use std::sync::Arc;
use storage::RecordingStorage;

pub const BASE_URL: &str = "https://x";

/// Lifecycle plus handles on its collaborators.
pub struct TestLifecycle {
    pub lifecycle: ImageLifecycle,
    pub storage: Arc<RecordingStorage>,
    pub entities: Arc<TestEntities>,
}

pub fn setup_lifecycle() -> TestLifecycle {
    setup_lifecycle_with(ImageSettings::default())
}

pub fn setup_lifecycle_with(settings: ImageSettings) -> TestLifecycle {
    let storage = Arc::new(RecordingStorage::new(BASE_URL, "images"));
    let entities = Arc::new(TestEntities::default());
    let lifecycle = ImageLifecycle::new(storage.clone(), entities.clone(), settings);
    TestLifecycle {
        lifecycle,
        storage,
        entities,
    }
}
