#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use hearth_services::{Storage, StorageBackend, StorageError, StorageResult};
use hearth_storage::{ListEntry, ListOptions, MemoryStorage, UploadOptions};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// `MemoryStorage` that records mutating calls and can be told to fail.
pub struct RecordingStorage {
    inner: MemoryStorage,
    lists: AtomicUsize,
    uploads: AtomicUsize,
    moves: Mutex<Vec<(String, String)>>,
    removes: Mutex<Vec<Vec<String>>>,
    fail_list: AtomicBool,
    fail_move: AtomicBool,
    fail_remove: AtomicBool,
    fail_upload: AtomicBool,
}

impl RecordingStorage {
    pub fn new(base_url: &str, bucket: &str) -> Self {
        Self {
            inner: MemoryStorage::new(base_url, bucket),
            lists: AtomicUsize::new(0),
            uploads: AtomicUsize::new(0),
            moves: Mutex::new(Vec::new()),
            removes: Mutex::new(Vec::new()),
            fail_list: AtomicBool::new(false),
            fail_move: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
            fail_upload: AtomicBool::new(false),
        }
    }

    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }

    /// Seed an object without recording a call.
    pub async fn seed(&self, path: &str, created_at: DateTime<Utc>) {
        self.inner
            .insert_object(path, Bytes::from_static(b"image"), created_at)
            .await;
    }

    pub fn fail_list(&self) {
        self.fail_list.store(true, Ordering::SeqCst);
    }

    /// Every move fails as if the source were already gone.
    pub fn fail_move(&self) {
        self.fail_move.store(true, Ordering::SeqCst);
    }

    pub fn fail_remove(&self) {
        self.fail_remove.store(true, Ordering::SeqCst);
    }

    pub fn fail_upload(&self) {
        self.fail_upload.store(true, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn moves(&self) -> Vec<(String, String)> {
        self.moves.lock().unwrap().clone()
    }

    pub fn removes(&self) -> Vec<Vec<String>> {
        self.removes.lock().unwrap().clone()
    }

    /// Calls of any kind that reached the store.
    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.upload_calls() + self.moves().len() + self.removes().len()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn list(&self, prefix: &str, options: &ListOptions) -> StorageResult<Vec<ListEntry>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StorageError::ListFailed("listing unavailable".to_string()));
        }
        self.inner.list(prefix, options).await
    }

    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("bucket is read-only".to_string()));
        }
        self.inner.upload(path, data, options).await
    }

    async fn move_object(&self, from: &str, to: &str) -> StorageResult<()> {
        self.moves
            .lock()
            .unwrap()
            .push((from.to_string(), to.to_string()));
        if self.fail_move.load(Ordering::SeqCst) {
            return Err(StorageError::NotFound(from.to_string()));
        }
        self.inner.move_object(from, to).await
    }

    async fn remove(&self, paths: &[String]) -> StorageResult<()> {
        self.removes.lock().unwrap().push(paths.to_vec());
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("permission denied".to_string()));
        }
        self.inner.remove(paths).await
    }

    fn public_url(&self, path: &str) -> String {
        self.inner.public_url(path)
    }

    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
