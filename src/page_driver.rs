//! Page driver: runs the six testers against one URL with per-tester
//! isolation (§4.3).

use std::time::Duration;

use chromiumoxide::Browser;
use tracing::warn;

use crate::config::ScanConfig;
use crate::model::Defect;
use crate::testers::{
    run_accessibility, run_broken_image, run_broken_link, run_console_error, run_network_error,
    run_responsive,
};

/// Runs all six testers against `url`, sequentially, each inside its own
/// timeout race (`config.tester_timeout_secs()`). A tester that times out
/// or panics contributes zero defects — its failure never fails the page.
pub async fn run_all(browser: &Browser, url: &str, config: &ScanConfig) -> Vec<Defect> {
    let mut defects = Vec::new();
    let tester_timeout = Duration::from_secs(config.tester_timeout_secs());
    let link_check_timeout = Duration::from_secs(config.link_check_timeout_secs());

    macro_rules! run_tester {
        ($name:literal, $func:expr) => {
            match tokio::time::timeout(tester_timeout, $func(browser, url)).await {
                Ok(mut found) => defects.append(&mut found),
                Err(_) => warn!("tester {} timed out on {url}", $name),
            }
        };
    }

    run_tester!("console-error", run_console_error);
    run_tester!("network-error", run_network_error);
    run_tester!("broken-image", run_broken_image);
    match tokio::time::timeout(tester_timeout, run_broken_link(browser, url, link_check_timeout)).await {
        Ok(mut found) => defects.append(&mut found),
        Err(_) => warn!("tester \"broken-link\" timed out on {url}"),
    }
    run_tester!("accessibility", run_accessibility);
    run_tester!("responsive", run_responsive);

    defects
}
