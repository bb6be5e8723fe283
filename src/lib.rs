pub mod analytics;
pub mod browser;
pub mod browser_setup;
pub mod config;
pub mod crawler;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod page_driver;
pub mod progress;
pub mod prompt;
pub mod registry;
pub mod report;
pub mod service;
mod testers;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::ScanError;
pub use model::{
    CacheEntry, Defect, DefectType, PageRecord, ProgressEvent, Report, Scan, ScanId, ScanStatus,
    Severity, Summary,
};
pub use service::{ReportStatus, ScanService};
