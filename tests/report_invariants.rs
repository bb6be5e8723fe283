//! Black-box checks of the report builder's cross-cutting invariants,
//! exercised through the public API rather than module-internal state.

use sitewatch_scan_engine::model::{Defect, DefectType, PageRecord, Severity};
use sitewatch_scan_engine::report;

fn page(url: &str, title: &str, defects: Vec<Defect>) -> PageRecord {
    let mut p = PageRecord::new(url, title, 12);
    p.defects = defects;
    p
}

/// Mirrors the "broken-image and console-error" scenario: two distinct
/// defects on a single page, neither eligible for dedup.
#[test]
fn broken_image_and_console_error_on_one_page() {
    let broken_image = Defect::new(
        DefectType::BrokenImage,
        Severity::Warning,
        "Broken image: missing.png",
        "Image failed to load: /missing.png",
        "http://site/",
    );
    let console_error = Defect::new(
        DefectType::ConsoleError,
        Severity::Warning,
        "Console error: boom",
        "boom",
        "http://site/",
    );

    let pages = vec![page("http://site/", "Home", vec![broken_image, console_error])];
    let report = report::build("http://site/", pages, vec![]);

    assert_eq!(report.summary.total_defects, 2);
    assert_eq!(*report.summary.by_severity.get("warning").unwrap(), 2);
    assert_eq!(*report.summary.by_severity.get("critical").unwrap(), 0);
    assert!(report.pages[0].defects[0].details.contains("missing.png") || report.pages[0].defects[1].details.contains("missing.png"));
}

/// Every `DefectType` key is present even when nothing of that type ever
/// occurred, and summary totals agree across all three views.
#[test]
fn summary_views_agree_and_every_type_key_is_present_at_zero() {
    let report = report::build("http://site/", vec![page("http://site/", "Home", vec![])], vec![]);

    assert_eq!(report.pages_found, 1);
    assert_eq!(report.summary.total_defects, 0);
    for ty in DefectType::ALL {
        assert_eq!(*report.summary.by_type.get(ty.as_str()).unwrap(), 0);
    }
    for sev in ["critical", "warning", "info"] {
        assert_eq!(*report.summary.by_severity.get(sev).unwrap(), 0);
    }
}

/// Sum of per-severity counts, sum of per-type counts, totalDefects, and
/// the sum of each page's defect count must all agree (§8 invariant).
#[test]
fn severity_and_type_sums_match_total_and_per_page_counts() {
    let a = Defect::new(DefectType::ConsoleError, Severity::Critical, "a", "1", "http://site/");
    let b = Defect::new(DefectType::NetworkError, Severity::Warning, "b", "2", "http://site/");
    let c = Defect::new(DefectType::Accessibility, Severity::Info, "c", "3", "http://site/about");

    let pages = vec![
        page("http://site/", "Home", vec![a, b]),
        page("http://site/about", "About", vec![c]),
    ];
    let report = report::build("http://site/", pages, vec![]);

    let per_page_sum: usize = report.pages.iter().map(|p| p.defects.len()).sum();
    let severity_sum: usize = report.summary.by_severity.values().sum();
    let type_sum: usize = report.summary.by_type.values().sum();

    assert_eq!(report.summary.total_defects, per_page_sum);
    assert_eq!(report.summary.total_defects, severity_sum);
    assert_eq!(report.summary.total_defects, type_sum);
}

/// No two defects in a finished report share a fingerprint, and every
/// kept defect has a non-empty identifier.
#[test]
fn no_duplicate_fingerprints_and_every_defect_has_an_id() {
    let d1 = Defect::new(DefectType::BrokenLink, Severity::Warning, "Broken link: /x", "Returned 404", "http://site/");
    let d2 = Defect::new(DefectType::BrokenLink, Severity::Warning, "Broken link: /x", "Returned 404", "http://site/about");
    let d3 = Defect::new(DefectType::BrokenLink, Severity::Warning, "Broken link: /y", "Returned 404", "http://site/about");

    let pages = vec![page("http://site/", "Home", vec![d1]), page("http://site/about", "About", vec![d2, d3])];
    let report = report::build("http://site/", pages, vec![]);

    assert_eq!(report.summary.total_defects, 2);
    let mut fingerprints = std::collections::HashSet::new();
    for p in &report.pages {
        for d in &p.defects {
            assert!(!d.id.is_empty());
            assert!(fingerprints.insert(d.fingerprint()), "duplicate fingerprint survived dedup");
        }
    }
}
