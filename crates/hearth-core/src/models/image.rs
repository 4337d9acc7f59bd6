//! Values exchanged with callers of the image lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a fresh upload landed. The caller keeps this (typically in a draft)
/// until the owning entity is created and the URL is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub url: String,
    pub path: String,
}

/// One object found while walking a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Top-level folder the object lives in (the uploading user's id).
    pub owner: String,
    pub filename: String,
    /// Creation time reported by the store, if any.
    pub created_at: Option<DateTime<Utc>>,
}

impl StoredObject {
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.filename)
    }

    /// True when the object was created strictly before `cutoff`.
    /// Objects without a creation time are never considered older.
    pub fn created_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at.is_some_and(|created| created < cutoff)
    }
}
