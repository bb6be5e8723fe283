//! Error taxonomy for the scan engine, per the error-handling design table.

use crate::model::ScanId;

/// Errors surfaced across scan-engine boundaries.
///
/// Most pipeline-internal failures (tester timeouts, per-link checks, crawl
/// load failures) are swallowed at their own layer and never reach this
/// type; `ScanError` covers the failures that propagate up to a `Scan`'s
/// terminal state or that reject a `start_scan` call synchronously.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("invalid seed URL: {0}")]
    InvalidSeedUrl(String),

    #[error("a scan is already running")]
    ScanAlreadyRunning,

    #[error("no scan found with id {0}")]
    ScanNotFound(ScanId),

    #[error("browser launch failed: {0}")]
    BrowserLaunch(#[source] anyhow::Error),

    #[error("scan exceeded its whole-scan timeout")]
    WholeScanTimeout,

    #[error("prompt cache I/O error: {0}")]
    CacheIo(#[source] std::io::Error),

    #[error("prompt cache file was corrupt and has been reset: {0}")]
    CacheCorrupt(String),
}
