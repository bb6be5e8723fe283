//! `ScanConfig`: the tunable knobs of the scan pipeline, with the defaults
//! named in the component design (§4.1, §4.3, §4.4, §5).

use std::path::PathBuf;

use super::builder::ScanConfigBuilder;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub(crate) max_pages: usize,
    pub(crate) max_concurrency: usize,
    pub(crate) tester_timeout_secs: u64,
    pub(crate) link_check_timeout_secs: u64,
    pub(crate) crawl_nav_timeout_secs: u64,
    pub(crate) crawl_handler_timeout_secs: u64,
    pub(crate) whole_scan_timeout_secs: u64,
    pub(crate) headless: bool,
    pub(crate) cache_file_path: PathBuf,
    pub(crate) analytics_file_path: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_pages: 20,
            max_concurrency: 3,
            tester_timeout_secs: 30,
            link_check_timeout_secs: 8,
            crawl_nav_timeout_secs: 15,
            crawl_handler_timeout_secs: 30,
            whole_scan_timeout_secs: 300,
            headless: true,
            cache_file_path: PathBuf::from("prompt_cache.json"),
            analytics_file_path: None,
        }
    }
}

impl ScanConfig {
    /// Create a builder pre-populated with defaults.
    #[must_use]
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }
}
