#![allow(dead_code)]

use async_trait::async_trait;
use hearth_core::{AppError, EntityType};
use hearth_services::EntityLookup;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Entity table held in memory. Ids in `failing` make the lookup error.
#[derive(Default)]
pub struct TestEntities {
    rows: Mutex<HashSet<(EntityType, String)>>,
    failing: Mutex<HashSet<String>>,
    lookups: AtomicUsize,
}

impl TestEntities {
    pub fn insert(&self, entity_type: EntityType, id: &str) {
        self.rows.lock().unwrap().insert((entity_type, id.to_string()));
    }

    pub fn fail_lookups_for(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntityLookup for TestEntities {
    async fn exists(&self, entity_type: EntityType, entity_id: &str) -> Result<bool, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(entity_id) {
            return Err(AppError::Internal(format!(
                "connection reset while querying {}",
                entity_type.table_name()
            )));
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .contains(&(entity_type, entity_id.to_string())))
    }
}
