//! Exercises `ScanService`'s synchronous guards: seed URL validation and
//! the one-scan-at-a-time rule, without driving a real browser.

use sitewatch_scan_engine::{ScanConfig, ScanService};

async fn service() -> std::sync::Arc<ScanService> {
    let dir = tempfile::tempdir().unwrap();
    let config = ScanConfig::builder().cache_file_path(dir.path().join("cache.json")).build().unwrap();
    ScanService::with_defaults(config).await
}

#[tokio::test]
async fn rejects_malformed_seed_url_before_spawning_anything() {
    let svc = service().await;
    let result = svc.start_scan("not a url");
    assert!(result.is_err());
}

#[tokio::test]
async fn rejects_hostname_without_a_tld() {
    let svc = service().await;
    let result = svc.start_scan("http://localhost");
    assert!(result.is_err());
}

#[tokio::test]
async fn unknown_scan_id_has_no_report_and_no_progress_subscription() {
    let svc = service().await;
    assert!(svc.get_report("does-not-exist").is_err());
    assert!(svc.subscribe_progress("does-not-exist", |_| {}).is_err());
}
