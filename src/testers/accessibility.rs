//! Accessibility tester (`accessibility`, §4.2.5).

use chromiumoxide::Browser;
use serde::Deserialize;

use crate::model::{Defect, DefectType, Severity};

use super::common::settle;
use super::js_scripts::ACCESSIBILITY_AUDIT_SCRIPT;

const MAX_VIOLATIONS: usize = 10;

#[derive(Deserialize)]
struct Violation {
    #[serde(rename = "ruleId")]
    rule_id: String,
    help: String,
    description: String,
    impact: String,
    nodes: Vec<String>,
}

fn severity_for_impact(impact: &str) -> Severity {
    match impact {
        "critical" => Severity::Critical,
        "serious" => Severity::Warning,
        _ => Severity::Info,
    }
}

/// Runs the audit after a 300 ms settle; the accessibility tester gets a
/// dedicated, freshly-created browser context so its injected probes can't
/// leak into other testers' pages.
pub async fn run(browser: &Browser, url: &str) -> Vec<Defect> {
    let Ok(page) = browser.new_page("about:blank").await else {
        return Vec::new();
    };

    let _ = tokio::time::timeout(std::time::Duration::from_secs(15), page.goto(url)).await;
    let _ = page.wait_for_navigation().await;
    settle(300).await;

    let violations: Vec<Violation> = page
        .evaluate(ACCESSIBILITY_AUDIT_SCRIPT)
        .await
        .ok()
        .and_then(|v| v.into_value().ok())
        .unwrap_or_default();

    let defects = violations
        .into_iter()
        .take(MAX_VIOLATIONS)
        .map(|v| {
            let snippets = v.nodes.join(", ");
            Defect::new(
                DefectType::Accessibility,
                severity_for_impact(&v.impact),
                format!("{}: {}", v.rule_id, v.help),
                format!("{}. Affected elements: {snippets}", v.description),
                url,
            )
        })
        .collect();

    let _ = page.close().await;
    defects
}
