//! Report builder: cross-page dedup, stable severity sort, summary
//! counters (§4.6).

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use uuid::Uuid;

use crate::model::{DefectType, PageRecord, Report, Summary};

/// Builds the final report from crawl-discovery-ordered pages whose
/// defects are already hint-populated. `pages_found` is the page count
/// before dedup (dedup only removes defects, never pages).
#[must_use]
pub fn build(seed_url: &str, pages: Vec<PageRecord>, warnings: Vec<String>) -> Report {
    let pages_found = pages.len();
    let mut seen_fingerprints: HashSet<String> = HashSet::new();
    let mut kept_pages = Vec::with_capacity(pages.len());

    for mut page in pages {
        let mut kept = Vec::new();
        for mut defect in page.defects.drain(..) {
            let fingerprint = defect.fingerprint();
            if !seen_fingerprints.insert(fingerprint) {
                continue;
            }
            defect.id = Uuid::new_v4().to_string();
            kept.push(defect);
        }
        kept.sort_by_key(|d| d.severity);
        page.defects = kept;
        kept_pages.push(page);
    }

    let mut by_severity: HashMap<String, usize> = HashMap::new();
    let mut by_type: HashMap<String, usize> = DefectType::ALL.iter().map(|t| (t.as_str().to_string(), 0)).collect();
    let mut total_defects = 0;

    for page in &kept_pages {
        for defect in &page.defects {
            total_defects += 1;
            *by_severity.entry(defect.severity.as_str().to_string()).or_insert(0) += 1;
            *by_type.entry(defect.kind.as_str().to_string()).or_insert(0) += 1;
        }
    }
    for severity in ["critical", "warning", "info"] {
        by_severity.entry(severity.to_string()).or_insert(0);
    }

    Report {
        seed_url: seed_url.to_string(),
        timestamp: Utc::now(),
        pages_found,
        pages: kept_pages,
        summary: Summary { total_defects, by_severity, by_type },
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Defect, Severity};

    fn page(url: &str, defects: Vec<Defect>) -> PageRecord {
        let mut p = PageRecord::new(url, "title", 0);
        p.defects = defects;
        p
    }

    #[test]
    fn dedup_keeps_earliest_occurrence() {
        let d1 = Defect::new(DefectType::ConsoleError, Severity::Warning, "Console error: boom", "boom", "http://site/");
        let d2 = Defect::new(DefectType::ConsoleError, Severity::Warning, "Console error: boom", "boom", "http://site/about");
        let report = build("http://site/", vec![page("http://site/", vec![d1]), page("http://site/about", vec![d2])], vec![]);

        assert_eq!(report.summary.total_defects, 1);
        assert_eq!(report.pages[0].defects.len(), 1);
        assert_eq!(report.pages[1].defects.len(), 0);
    }

    #[test]
    fn summary_counts_are_consistent() {
        let d1 = Defect::new(DefectType::ConsoleError, Severity::Critical, "a", "1", "http://site/");
        let d2 = Defect::new(DefectType::BrokenImage, Severity::Warning, "b", "2", "http://site/");
        let report = build("http://site/", vec![page("http://site/", vec![d1, d2])], vec![]);

        assert_eq!(report.summary.total_defects, 2);
        assert_eq!(report.summary.by_severity.values().sum::<usize>(), 2);
        assert_eq!(report.summary.by_type.values().sum::<usize>(), 2);
        assert_eq!(report.summary.by_type.len(), 6);
    }

    #[test]
    fn defects_sorted_critical_before_warning_before_info() {
        let d_info = Defect::new(DefectType::Responsive, Severity::Info, "a", "1", "http://site/");
        let d_critical = Defect::new(DefectType::ConsoleError, Severity::Critical, "b", "2", "http://site/");
        let report = build("http://site/", vec![page("http://site/", vec![d_info, d_critical])], vec![]);

        assert_eq!(report.pages[0].defects[0].severity, Severity::Critical);
        assert_eq!(report.pages[0].defects[1].severity, Severity::Info);
    }

    #[test]
    fn pages_found_counts_pages_before_dedup_does_not_drop_pages() {
        let report = build("http://site/", vec![page("http://site/", vec![]), page("http://site/about", vec![])], vec![]);
        assert_eq!(report.pages_found, 2);
    }
}
