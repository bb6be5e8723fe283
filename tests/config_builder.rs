//! Black-box tests of the configuration builder's required-field
//! validation and default values.

use sitewatch_scan_engine::ScanConfig;

#[test]
fn defaults_match_the_documented_values() {
    let config = ScanConfig::builder().build().unwrap();
    assert_eq!(config.max_pages(), 20);
    assert_eq!(config.max_concurrency(), 3);
    assert_eq!(config.tester_timeout_secs(), 30);
    assert_eq!(config.link_check_timeout_secs(), 8);
    assert_eq!(config.whole_scan_timeout_secs(), 300);
    assert!(config.headless());
    assert!(config.analytics_file_path().is_none());
}

#[test]
fn zero_max_pages_is_rejected() {
    let result = ScanConfig::builder().max_pages(0).build();
    assert!(result.is_err());
}

#[test]
fn zero_max_concurrency_is_rejected() {
    let result = ScanConfig::builder().max_concurrency(0).build();
    assert!(result.is_err());
}

#[test]
fn builder_overrides_apply() {
    let config = ScanConfig::builder()
        .max_pages(5)
        .max_concurrency(1)
        .headless(false)
        .cache_file_path("/tmp/custom-cache.json")
        .analytics_file_path("/tmp/analytics.jsonl")
        .build()
        .unwrap();

    assert_eq!(config.max_pages(), 5);
    assert_eq!(config.max_concurrency(), 1);
    assert!(!config.headless());
    assert_eq!(config.cache_file_path(), std::path::Path::new("/tmp/custom-cache.json"));
    assert!(config.analytics_file_path().is_some());
}
