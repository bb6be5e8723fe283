//! Responsive tester (`responsive`, §4.2.6).

use chromiumoxide::Browser;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use serde::Deserialize;

use crate::model::{Defect, DefectType, Severity};

use super::common::settle;
use super::js_scripts::OVERFLOW_SCRIPT;

struct Viewport {
    name: &'static str,
    width: u32,
    height: u32,
    severity: Severity,
}

const VIEWPORTS: &[Viewport] = &[
    Viewport { name: "Mobile", width: 375, height: 812, severity: Severity::Warning },
    Viewport { name: "Tablet", width: 768, height: 1024, severity: Severity::Warning },
    Viewport { name: "Desktop", width: 1440, height: 900, severity: Severity::Info },
];

#[derive(Deserialize)]
struct Overflow {
    #[serde(rename = "scrollWidth")]
    scroll_width: u32,
    #[serde(rename = "clientWidth")]
    client_width: u32,
}

/// For each fixed viewport: set device metrics, navigate, settle 300 ms,
/// and check whether the document overflows horizontally.
pub async fn run(browser: &Browser, url: &str) -> Vec<Defect> {
    let mut defects = Vec::new();

    for viewport in VIEWPORTS {
        let Ok(page) = browser.new_page("about:blank").await else {
            continue;
        };

        let metrics = match SetDeviceMetricsOverrideParams::builder()
            .width(viewport.width)
            .height(viewport.height)
            .device_scale_factor(1.0)
            .mobile(viewport.name == "Mobile")
            .build()
        {
            Ok(params) => params,
            Err(_) => {
                let _ = page.close().await;
                continue;
            }
        };
        let _ = page.execute(metrics).await;

        let _ = tokio::time::timeout(std::time::Duration::from_secs(15), page.goto(url)).await;
        let _ = page.wait_for_navigation().await;
        settle(300).await;

        let overflow: Option<Overflow> = page
            .evaluate(OVERFLOW_SCRIPT)
            .await
            .ok()
            .and_then(|v| v.into_value().ok());

        if let Some(o) = overflow {
            if o.scroll_width > o.client_width {
                defects.push(Defect::new(
                    DefectType::Responsive,
                    viewport.severity,
                    format!("Horizontal overflow at {}", viewport.name),
                    format!(
                        "Page has horizontal overflow at {}px width. Content width: {}px, viewport: {}px.",
                        viewport.width, o.scroll_width, viewport.width
                    ),
                    url,
                ));
            }
        }

        let _ = page.close().await;
    }

    defects
}
