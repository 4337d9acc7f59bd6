//! Test fixtures: image blobs and object timestamps.

#![allow(dead_code)]

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use hearth_services::ImageFile;

/// JPEG start-of-image marker padded to `size` bytes.
pub fn jpeg_of_size(size: usize) -> Bytes {
    let mut data = vec![0u8; size.max(4)];
    data[..4].copy_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0]);
    data.truncate(size);
    Bytes::from(data)
}

pub fn jpeg_file(name: &str, size: usize) -> ImageFile {
    ImageFile::new(name, "image/jpeg", jpeg_of_size(size))
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}
