//! Data model shared across the pipeline: defect/report/progress/cache/scan
//! entities, per the data-model table.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub type ScanId = String;

/// Closed set of defect categories; unknown values are rejected at the
/// boundary rather than added to this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefectType {
    ConsoleError,
    NetworkError,
    BrokenLink,
    BrokenImage,
    Accessibility,
    Responsive,
}

impl DefectType {
    /// All six variants, in a fixed order — used to seed summary counters
    /// so every key is always present even at zero.
    pub const ALL: [DefectType; 6] = [
        DefectType::ConsoleError,
        DefectType::NetworkError,
        DefectType::BrokenLink,
        DefectType::BrokenImage,
        DefectType::Accessibility,
        DefectType::Responsive,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DefectType::ConsoleError => "console-error",
            DefectType::NetworkError => "network-error",
            DefectType::BrokenLink => "broken-link",
            DefectType::BrokenImage => "broken-image",
            DefectType::Accessibility => "accessibility",
            DefectType::Responsive => "responsive",
        }
    }
}

impl std::fmt::Display for DefectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total order critical < warning < info, matching discovery-order tie
/// breaking expected by the report builder's stable sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A single observed defect. `id` is assigned late by the report builder;
/// `fix_prompt` is mutated exactly once by the prompt stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defect {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DefectType,
    pub severity: Severity,
    pub title: String,
    pub details: String,
    pub page: String,
    #[serde(default)]
    pub fix_prompt: String,
}

impl Defect {
    #[must_use]
    pub fn new(
        kind: DefectType,
        severity: Severity,
        title: impl Into<String>,
        details: impl Into<String>,
        page: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            kind,
            severity,
            title: title.into(),
            details: details.into(),
            page: page.into(),
            fix_prompt: String::new(),
        }
    }

    /// `<type>::<title>::<details>` — used for cross-page dedup in the
    /// report builder.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        format!("{}::{}::{}", self.kind, self.title, self.details)
    }
}

/// One crawled page and its (eventually deduped, severity-sorted) defects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub load_time_millis: u64,
    pub defects: Vec<Defect>,
}

impl PageRecord {
    #[must_use]
    pub fn new(url: impl Into<String>, title: impl Into<String>, load_time_millis: u64) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            load_time_millis,
            defects: Vec::new(),
        }
    }
}

/// Summary counters attached to a finished report; every `DefectType` key
/// is always present, even at zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_defects: usize,
    pub by_severity: HashMap<String, usize>,
    pub by_type: HashMap<String, usize>,
}

/// The finished, immutable artifact of a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub seed_url: String,
    pub timestamp: DateTime<Utc>,
    pub pages_found: usize,
    pub pages: Vec<PageRecord>,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// One entry on the progress stream. `progress` is monotonically
/// non-decreasing within a scan and reaches 100 exactly once, when the
/// report is ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub phase: String,
    pub message: String,
    pub progress: u8,
}

impl ProgressEvent {
    #[must_use]
    pub fn new(phase: impl Into<String>, message: impl Into<String>, progress: u8) -> Self {
        Self {
            phase: phase.into(),
            message: message.into(),
            progress,
        }
    }
}

/// One row of the prompt cache: key, hint, creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub hint: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle state of a `Scan`. Transitions are one-way: `Running` →
/// `Complete` or `Running` → `Error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScanStatus {
    Running,
    Complete { report: Report },
    Error { message: String },
}

/// A registered scan. The registry never removes a `Scan`; its `status`
/// transitions exactly once, from `Running` to a terminal state.
pub struct Scan {
    pub id: ScanId,
    pub seed_url: String,
    pub status: Mutex<ScanStatus>,
}

impl Scan {
    #[must_use]
    pub fn new(id: ScanId, seed_url: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id,
            seed_url: seed_url.into(),
            status: Mutex::new(ScanStatus::Running),
        })
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(&*self.status.lock(), ScanStatus::Running)
    }
}
