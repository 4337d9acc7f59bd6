//! Upload stage tests.
//!
//! Run with: `cargo test -p hearth-services --test upload_test`

mod helpers;

use bytes::Bytes;
use hearth_core::constants::DEFAULT_MAX_IMAGE_SIZE_BYTES;
use hearth_core::models::is_temporary;
use hearth_core::StaticIdentity;
use futures::TryStreamExt;
use hearth_services::{ImageError, ImageFile, ImageSettings, Storage};
use helpers::fixtures::jpeg_file;
use helpers::{setup_lifecycle, setup_lifecycle_with};
use std::collections::HashSet;
use std::error::Error as _;

fn assert_upload_path(path: &str, owner: &str, folder: &str, ext: &str) {
    let (dir, filename) = path.split_once('/').expect("owner folder");
    assert_eq!(dir, owner);

    let rest = filename
        .strip_prefix(&format!("{}-", folder))
        .unwrap_or_else(|| panic!("{} should start with {}-", filename, folder));
    let (millis, token_ext) = rest.split_once('-').expect("timestamp");
    assert!(!millis.is_empty() && millis.chars().all(|c| c.is_ascii_digit()));

    let (token, extension) = token_ext.split_once('.').expect("extension");
    assert_eq!(token.len(), 8);
    assert!(token
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_eq!(extension, ext);
}

#[tokio::test]
async fn test_upload_jpeg_as_signed_in_user() {
    let t = setup_lifecycle();
    let identity = StaticIdentity::signed_in("u1");

    let result = t
        .lifecycle
        .upload_image(jpeg_file("holiday.jpg", 2 * 1024 * 1024), &identity, None)
        .await
        .unwrap();

    assert_upload_path(&result.path, "u1", "temp-upload", "jpg");
    assert!(is_temporary(&result.path));
    assert_eq!(result.url, format!("https://x/images/{}", result.path));

    let stored = t.storage.inner().get(&result.path).await.unwrap();
    assert_eq!(stored.len(), 2 * 1024 * 1024);
    assert_eq!(
        t.storage.inner().content_type(&result.path).await.as_deref(),
        Some("image/jpeg")
    );
}

#[tokio::test]
async fn test_upload_requires_identity() {
    let t = setup_lifecycle();

    let err = t
        .lifecycle
        .upload_image(jpeg_file("a.jpg", 10), &StaticIdentity::anonymous(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ImageError::AuthenticationRequired));
    assert_eq!(t.storage.upload_calls(), 0);
}

#[tokio::test]
async fn test_upload_rejects_non_image() {
    let t = setup_lifecycle();
    let file = ImageFile::new("notes.txt", "text/plain", Bytes::from_static(b"hello"));

    let err = t
        .lifecycle
        .upload_image(file, &StaticIdentity::signed_in("u1"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ImageError::InvalidFileType(ref ct) if ct == "text/plain"));
    assert_eq!(t.storage.upload_calls(), 0);
}

#[tokio::test]
async fn test_auth_is_checked_before_file_type() {
    let t = setup_lifecycle();
    let file = ImageFile::new("notes.txt", "text/plain", Bytes::from_static(b"hello"));

    let err = t
        .lifecycle
        .upload_image(file, &StaticIdentity::anonymous(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ImageError::AuthenticationRequired));
}

#[tokio::test]
async fn test_upload_size_limit() {
    let t = setup_lifecycle();
    let identity = StaticIdentity::signed_in("u1");

    let err = t
        .lifecycle
        .upload_image(
            jpeg_file("big.jpg", DEFAULT_MAX_IMAGE_SIZE_BYTES + 1),
            &identity,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ImageError::FileTooLarge { size, max }
            if size == DEFAULT_MAX_IMAGE_SIZE_BYTES + 1 && max == DEFAULT_MAX_IMAGE_SIZE_BYTES
    ));
    assert_eq!(t.storage.upload_calls(), 0);

    t.lifecycle
        .upload_image(
            jpeg_file("exact.jpg", DEFAULT_MAX_IMAGE_SIZE_BYTES),
            &identity,
            None,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_configured_size_limit() {
    let t = setup_lifecycle_with(ImageSettings {
        max_file_size: 100,
        ..ImageSettings::default()
    });

    let err = t
        .lifecycle
        .upload_image(jpeg_file("a.jpg", 101), &StaticIdentity::signed_in("u1"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ImageError::FileTooLarge { max: 100, .. }));
}

#[tokio::test]
async fn test_upload_custom_folder() {
    let t = setup_lifecycle();

    let result = t
        .lifecycle
        .upload_image(
            ImageFile::new("avatar", "image/png", Bytes::from_static(b"png")),
            &StaticIdentity::signed_in("u7"),
            Some("avatar"),
        )
        .await
        .unwrap();

    assert_upload_path(&result.path, "u7", "avatar", "png");
}

#[tokio::test]
async fn test_malformed_mime_subtype_stays_walkable() {
    let t = setup_lifecycle();

    let result = t
        .lifecycle
        .upload_image(
            ImageFile::new("photo", "image/png/evil", Bytes::from_static(b"png")),
            &StaticIdentity::signed_in("u1"),
            None,
        )
        .await
        .unwrap();

    assert_upload_path(&result.path, "u1", "temp-upload", "bin");
    assert_eq!(result.path.matches('/').count(), 1);

    let walked: Vec<_> = t.storage.walk(10).try_collect().await.unwrap();
    assert_eq!(walked.len(), 1);
    assert_eq!(format!("{}/{}", walked[0].owner, walked[0].filename), result.path);
}

#[tokio::test]
async fn test_upload_rejects_nested_folder() {
    let t = setup_lifecycle();

    let err = t
        .lifecycle
        .upload_image(
            jpeg_file("a.jpg", 10),
            &StaticIdentity::signed_in("u1"),
            Some("../other"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ImageError::InvalidFolder(_)));
    assert_eq!(t.storage.upload_calls(), 0);
}

#[tokio::test]
async fn test_storage_failure_is_wrapped() {
    let t = setup_lifecycle();
    t.storage.fail_upload();

    let err = t
        .lifecycle
        .upload_image(jpeg_file("a.jpg", 10), &StaticIdentity::signed_in("u1"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ImageError::UploadFailed(_)));
    assert!(err.to_string().starts_with("Failed to upload image:"));
    assert!(err.source().is_some());
    assert!(t.storage.inner().paths().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_uploads_get_distinct_paths() {
    let t = setup_lifecycle();
    let identity = StaticIdentity::signed_in("u1");

    let uploads = (0..20).map(|_| {
        t.lifecycle
            .upload_image(jpeg_file("burst.jpg", 16), &identity, None)
    });
    let results = futures::future::join_all(uploads).await;

    let paths: HashSet<String> = results.into_iter().map(|r| r.unwrap().path).collect();
    assert_eq!(paths.len(), 20);
    assert_eq!(t.storage.inner().paths().await.len(), 20);
}
