//! Write-only analytics sink: one structured record per completed scan
//! (§6). The core never reads these back.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::model::Report;

#[derive(Debug, Clone, Serialize)]
pub struct ScanCompleteRecord {
    pub event: &'static str,
    pub domain: String,
    #[serde(rename = "pagesScanned")]
    pub pages_scanned: usize,
    #[serde(rename = "totalBugs")]
    pub total_bugs: usize,
    #[serde(rename = "bugsByType")]
    pub bugs_by_type: std::collections::HashMap<String, usize>,
    #[serde(rename = "bugsBySeverity")]
    pub bugs_by_severity: std::collections::HashMap<String, usize>,
    #[serde(rename = "usedTemplates")]
    pub used_templates: bool,
    pub ts: DateTime<Utc>,
}

impl ScanCompleteRecord {
    #[must_use]
    pub fn from_report(report: &Report, used_templates: bool) -> Self {
        let domain = url::Url::parse(&report.seed_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| report.seed_url.clone());

        Self {
            event: "scan_complete",
            domain,
            pages_scanned: report.pages_found,
            total_bugs: report.summary.total_defects,
            bugs_by_type: report.summary.by_type.clone(),
            bugs_by_severity: report.summary.by_severity.clone(),
            used_templates,
            ts: report.timestamp,
        }
    }
}

pub trait AnalyticsSink: Send + Sync {
    fn record<'a>(&'a self, record: ScanCompleteRecord) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

pub struct NoopAnalyticsSink;

impl AnalyticsSink for NoopAnalyticsSink {
    fn record<'a>(&'a self, _record: ScanCompleteRecord) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async {})
    }
}

/// Append-only JSONL file, one record per line.
pub struct JsonlFileAnalyticsSink {
    path: PathBuf,
}

impl JsonlFileAnalyticsSink {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AnalyticsSink for JsonlFileAnalyticsSink {
    fn record<'a>(&'a self, record: ScanCompleteRecord) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let line = match tokio::task::spawn_blocking(move || serde_json::to_string(&record)).await {
                Ok(Ok(line)) => line,
                _ => {
                    warn!("failed to serialize analytics record");
                    return;
                }
            };

            if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if let Err(e) = tokio::fs::create_dir_all(dir).await {
                    warn!("failed to create analytics directory: {e}");
                    return;
                }
            }

            use tokio::io::AsyncWriteExt;
            let file = tokio::fs::OpenOptions::new().create(true).append(true).open(&self.path).await;
            match file {
                Ok(mut f) => {
                    if let Err(e) = f.write_all(format!("{line}\n").as_bytes()).await {
                        warn!("failed to append analytics record: {e}");
                    }
                }
                Err(e) => warn!("failed to open analytics file {}: {e}", self.path.display()),
            }
        })
    }
}
