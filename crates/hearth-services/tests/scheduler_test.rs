//! Scheduled cleanup tests.
//!
//! Run with: `cargo test -p hearth-services --test scheduler_test`

mod helpers;

use hearth_core::{Config, EntityType};
use hearth_services::{CleanupReport, ImageCleanupService};
use helpers::fixtures::hours_ago;
use helpers::setup_lifecycle;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_run_once_cleans_temp_and_scans_orphans() {
    let t = setup_lifecycle();
    t.entities.insert(EntityType::Resource, "r1");
    t.storage.seed("u1/temp-upload-1-a.jpg", hours_ago(30)).await;
    t.storage.seed("u1/resource-r1-2-b.jpg", hours_ago(30)).await;
    t.storage.seed("u1/resource-r2-3-c.jpg", hours_ago(30)).await;

    let service = ImageCleanupService::new(t.lifecycle.clone(), Duration::from_secs(60), 24, true);
    let report = service.run_once().await;

    assert_eq!(
        report,
        CleanupReport {
            temp_images_deleted: Some(1),
            orphans_found: Some(vec!["u1/resource-r2-3-c.jpg".to_string()]),
        }
    );
    // the orphan scan is report-only
    assert!(t.storage.inner().contains("u1/resource-r2-3-c.jpg").await);
    assert_eq!(t.storage.removes().len(), 1);
}

#[tokio::test]
async fn test_run_once_continues_after_failure() {
    let t = setup_lifecycle();
    t.storage.fail_list();

    let service = ImageCleanupService::new(t.lifecycle.clone(), Duration::from_secs(60), 24, true);
    let report = service.run_once().await;

    assert_eq!(report, CleanupReport::default());
}

#[tokio::test]
async fn test_orphan_scan_disabled_by_default_config() {
    let t = setup_lifecycle();
    t.storage.seed("u1/resource-r9-1-a.jpg", hours_ago(1)).await;

    let service = ImageCleanupService::from_config(t.lifecycle.clone(), &Config::default());
    let report = service.run_once().await;

    assert_eq!(report.temp_images_deleted, Some(0));
    assert_eq!(report.orphans_found, None);
    assert_eq!(t.entities.lookups(), 0);
}

#[tokio::test]
async fn test_report_serializes() {
    let report = CleanupReport {
        temp_images_deleted: Some(3),
        orphans_found: None,
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["temp_images_deleted"], 3);
    assert!(json["orphans_found"].is_null());
}

#[tokio::test]
async fn test_scheduler_runs_on_start() {
    let t = setup_lifecycle();
    t.storage.seed("u1/temp-upload-1-a.jpg", hours_ago(30)).await;

    let service = Arc::new(ImageCleanupService::new(
        t.lifecycle.clone(),
        Duration::from_secs(3600),
        24,
        false,
    ));
    let handle = service.start();

    // first tick fires immediately
    let cleaned = tokio::time::timeout(Duration::from_secs(5), async {
        while t.storage.inner().contains("u1/temp-upload-1-a.jpg").await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    handle.abort();

    assert!(cleaned.is_ok());
}
