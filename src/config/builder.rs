//! Fluent builder for `ScanConfig`.

use std::path::PathBuf;

use anyhow::{Result, anyhow};

use super::types::ScanConfig;

#[derive(Debug, Clone)]
pub struct ScanConfigBuilder {
    max_pages: usize,
    max_concurrency: usize,
    tester_timeout_secs: u64,
    link_check_timeout_secs: u64,
    crawl_nav_timeout_secs: u64,
    crawl_handler_timeout_secs: u64,
    whole_scan_timeout_secs: u64,
    headless: bool,
    cache_file_path: PathBuf,
    analytics_file_path: Option<PathBuf>,
}

impl Default for ScanConfigBuilder {
    fn default() -> Self {
        let d = ScanConfig::default();
        Self {
            max_pages: d.max_pages,
            max_concurrency: d.max_concurrency,
            tester_timeout_secs: d.tester_timeout_secs,
            link_check_timeout_secs: d.link_check_timeout_secs,
            crawl_nav_timeout_secs: d.crawl_nav_timeout_secs,
            crawl_handler_timeout_secs: d.crawl_handler_timeout_secs,
            whole_scan_timeout_secs: d.whole_scan_timeout_secs,
            headless: d.headless,
            cache_file_path: d.cache_file_path,
            analytics_file_path: d.analytics_file_path,
        }
    }
}

impl ScanConfigBuilder {
    #[must_use]
    pub fn max_pages(mut self, n: usize) -> Self {
        self.max_pages = n;
        self
    }

    #[must_use]
    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n;
        self
    }

    #[must_use]
    pub fn tester_timeout_secs(mut self, secs: u64) -> Self {
        self.tester_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn link_check_timeout_secs(mut self, secs: u64) -> Self {
        self.link_check_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn crawl_nav_timeout_secs(mut self, secs: u64) -> Self {
        self.crawl_nav_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn crawl_handler_timeout_secs(mut self, secs: u64) -> Self {
        self.crawl_handler_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn whole_scan_timeout_secs(mut self, secs: u64) -> Self {
        self.whole_scan_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn cache_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_file_path = path.into();
        self
    }

    #[must_use]
    pub fn analytics_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.analytics_file_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<ScanConfig> {
        if self.max_pages == 0 {
            return Err(anyhow!("max_pages must be at least 1"));
        }
        if self.max_concurrency == 0 {
            return Err(anyhow!("max_concurrency must be at least 1"));
        }
        Ok(ScanConfig {
            max_pages: self.max_pages,
            max_concurrency: self.max_concurrency,
            tester_timeout_secs: self.tester_timeout_secs,
            link_check_timeout_secs: self.link_check_timeout_secs,
            crawl_nav_timeout_secs: self.crawl_nav_timeout_secs,
            crawl_handler_timeout_secs: self.crawl_handler_timeout_secs,
            whole_scan_timeout_secs: self.whole_scan_timeout_secs,
            headless: self.headless,
            cache_file_path: self.cache_file_path,
            analytics_file_path: self.analytics_file_path,
        })
    }
}
