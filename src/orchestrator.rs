//! Orchestrator: sequences the whole pipeline and publishes progress
//! (§4.4), under a whole-scan timeout.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::analytics::{AnalyticsSink, ScanCompleteRecord};
use crate::browser::LaunchedBrowser;
use crate::config::ScanConfig;
use crate::crawler;
use crate::error::ScanError;
use crate::model::{ProgressEvent, Report};
use crate::page_driver;
use crate::progress::ProgressBus;
use crate::prompt::{self, PromptCache};
use crate::report;

/// Runs the full pipeline for `seed_url`, publishing progress to `bus`,
/// bounded by the whole-scan timeout in `config`.
pub async fn run(
    seed_url: &str,
    config: &ScanConfig,
    bus: &ProgressBus,
    cache: Arc<PromptCache>,
    llm_api_key: Option<String>,
    llm_endpoint: &str,
    analytics: &dyn AnalyticsSink,
) -> Result<Report, ScanError> {
    let whole_scan_timeout = Duration::from_secs(config.whole_scan_timeout_secs());
    let result = tokio::time::timeout(
        whole_scan_timeout,
        run_pipeline(seed_url, config, bus, cache, llm_api_key, llm_endpoint, analytics),
    )
    .await;

    match result {
        Ok(inner) => inner,
        Err(_) => {
            error!("scan of {seed_url} exceeded its whole-scan timeout");
            Err(ScanError::WholeScanTimeout)
        }
    }
}

async fn run_pipeline(
    seed_url: &str,
    config: &ScanConfig,
    bus: &ProgressBus,
    cache: Arc<PromptCache>,
    llm_api_key: Option<String>,
    llm_endpoint: &str,
    analytics: &dyn AnalyticsSink,
) -> Result<Report, ScanError> {
    bus.publish(ProgressEvent::new("crawling", "Starting page discovery...", 0));

    let bus_for_crawl = bus;
    let mut pages = crawler::crawl(seed_url, config, |inner_pct, message| {
        let outer = (u32::from(inner_pct) * 30 / 100).min(30) as u8;
        bus_for_crawl.publish(ProgressEvent::new("crawling", message, outer));
    })
    .await?;
    bus.publish(ProgressEvent::new("crawling", format!("Found {} page(s)", pages.len()), 30));

    let total = pages.len();
    let browser = LaunchedBrowser::launch(config.headless())
        .await
        .map_err(ScanError::BrowserLaunch)?;

    for (i, page) in pages.iter_mut().enumerate() {
        let label = if page.title.is_empty() { page.url.clone() } else { page.title.clone() };
        let pct = 30 + ((i + 1) * 50 / total.max(1)).min(50);
        bus.publish(ProgressEvent::new(
            "testing",
            format!("Testing page {}/{total}: {label}", i + 1),
            pct as u8,
        ));

        let defects = page_driver::run_all(&browser.browser(), &page.url, config).await;
        page.defects = defects;
    }
    browser.shutdown().await;

    bus.publish(ProgressEvent::new("prompts", "Generating fix prompts...", 85));
    let all_defects: Vec<_> = pages.iter().flat_map(|p| p.defects.clone()).collect();
    let generation = prompt::generate(all_defects, &cache, llm_api_key.as_deref(), llm_endpoint).await;
    info!(
        "prompt generation: {} cache hits, {} cache misses, fallback={}",
        generation.cache_hits, generation.cache_misses, generation.used_fallback
    );

    let mut warnings = Vec::new();
    if generation.used_fallback {
        let reason = generation.fallback_reason.unwrap_or_else(|| "external remediation generator unavailable".to_string());
        bus.publish(ProgressEvent::new("prompts", reason.clone(), 90));
        warnings.push(reason);
    }

    reassign_defects(&mut pages, generation.defects);

    bus.publish(ProgressEvent::new("report", "Building report...", 95));
    let report = report::build(seed_url, pages, warnings);

    analytics
        .record(ScanCompleteRecord::from_report(&report, generation.used_fallback))
        .await;

    bus.publish(ProgressEvent::new("complete", "Scan complete!", 100));
    Ok(report)
}

/// Reassigns prompt-filled defects back into their originating page, in
/// the same relative order the generator received them.
fn reassign_defects(pages: &mut [crate::model::PageRecord], flat: Vec<crate::model::Defect>) {
    let mut flat = flat.into_iter();
    for page in pages.iter_mut() {
        let count = page.defects.len();
        page.defects = (&mut flat).take(count).collect();
    }
}

