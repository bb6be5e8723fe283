//! Broken-image tester (`broken-image`, §4.2.3).

use chromiumoxide::Browser;
use serde::Deserialize;

use crate::model::{Defect, DefectType, Severity};

use super::common::settle;
use super::js_scripts::BROKEN_IMAGES_SCRIPT;

#[derive(Deserialize)]
struct BrokenImage {
    src: String,
    alt: String,
}

/// DOM-content-loaded plus a 500 ms settle, then a zero-natural-width check
/// over every non-data-URI `<img>`.
pub async fn run(browser: &Browser, url: &str) -> Vec<Defect> {
    let Ok(page) = browser.new_page("about:blank").await else {
        return Vec::new();
    };

    let _ = tokio::time::timeout(std::time::Duration::from_secs(15), page.goto(url)).await;
    let _ = page.wait_for_navigation().await;
    settle(500).await;

    let broken: Vec<BrokenImage> = page
        .evaluate(BROKEN_IMAGES_SCRIPT)
        .await
        .ok()
        .and_then(|v| v.into_value().ok())
        .unwrap_or_default();

    let defects = broken
        .into_iter()
        .map(|img| {
            let label = if img.alt.is_empty() { &img.src } else { &img.alt };
            Defect::new(
                DefectType::BrokenImage,
                Severity::Warning,
                format!("Broken image: {label}"),
                format!("Image failed to load: {}", img.src),
                url,
            )
        })
        .collect();

    let _ = page.close().await;
    defects
}
