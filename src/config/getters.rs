//! Accessor methods for `ScanConfig`.

use std::path::{Path, PathBuf};

use super::types::ScanConfig;

impl ScanConfig {
    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    #[must_use]
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    #[must_use]
    pub fn tester_timeout_secs(&self) -> u64 {
        self.tester_timeout_secs
    }

    #[must_use]
    pub fn link_check_timeout_secs(&self) -> u64 {
        self.link_check_timeout_secs
    }

    #[must_use]
    pub fn crawl_nav_timeout_secs(&self) -> u64 {
        self.crawl_nav_timeout_secs
    }

    #[must_use]
    pub fn crawl_handler_timeout_secs(&self) -> u64 {
        self.crawl_handler_timeout_secs
    }

    #[must_use]
    pub fn whole_scan_timeout_secs(&self) -> u64 {
        self.whole_scan_timeout_secs
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn cache_file_path(&self) -> &Path {
        &self.cache_file_path
    }

    #[must_use]
    pub fn analytics_file_path(&self) -> Option<&PathBuf> {
        self.analytics_file_path.as_ref()
    }
}
