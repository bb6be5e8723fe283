//! Same-origin crawler: BFS discovery of pages reachable from a seed URL.
//!
//! Grounded in the BFS/semaphore/visited-set loop shape of the orchestrator
//! this engine grew out of, generalized to the simpler follow predicate and
//! progress contract specified for this pipeline (no path-scope
//! restriction, no circuit breaker, no retry backoff).

mod follow;

pub use follow::normalize_url;
use follow::should_follow;

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use dashmap::DashSet;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use url::Url;

use crate::browser::LaunchedBrowser;
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::model::PageRecord;

const TITLE_SCRIPT: &str = "document.title";

/// `document.querySelectorAll('a[href]')` resolved to absolute URLs by the
/// browser itself, so redirects and relative paths are already normalized.
const LINKS_SCRIPT: &str =
    "Array.from(document.querySelectorAll('a[href]')).map(a => a.href)";

struct PageLoadOutcome {
    final_url: String,
    title: String,
    load_time_millis: u64,
    links: Vec<String>,
}

async fn load_page(
    browser: &chromiumoxide::Browser,
    url: String,
    nav_timeout: Duration,
) -> anyhow::Result<PageLoadOutcome> {
    let page = browser
        .new_page("about:blank")
        .await
        .context("failed to open page")?;
    let started = Instant::now();

    let goto = tokio::time::timeout(nav_timeout, page.goto(&url))
        .await
        .context("navigation timed out")?
        .context("navigation failed")?;
    let _ = tokio::time::timeout(nav_timeout, goto.wait_for_navigation()).await;

    let final_url = page.url().await.ok().flatten().unwrap_or(url);
    let load_time_millis = started.elapsed().as_millis() as u64;

    let title = page
        .evaluate(TITLE_SCRIPT)
        .await
        .ok()
        .and_then(|v| v.into_value::<String>().ok())
        .unwrap_or_default();

    let links = page
        .evaluate(LINKS_SCRIPT)
        .await
        .ok()
        .and_then(|v| v.into_value::<Vec<String>>().ok())
        .unwrap_or_default();

    let _ = page.close().await;

    Ok(PageLoadOutcome {
        final_url,
        title,
        load_time_millis,
        links,
    })
}

/// Discover same-origin pages reachable from `seed_url`.
///
/// `on_progress` receives the inner 0-100 progress of the discovery phase
/// (callers remap it per §4.4 step 2's 0-30 outer range).
pub async fn crawl(
    seed_url: &str,
    config: &ScanConfig,
    on_progress: impl Fn(u8, String),
) -> Result<Vec<PageRecord>, ScanError> {
    let seed = Url::parse(seed_url).map_err(|e| ScanError::InvalidSeedUrl(e.to_string()))?;
    let seed_host = seed
        .host_str()
        .ok_or_else(|| ScanError::InvalidSeedUrl("seed URL has no host".into()))?
        .to_ascii_lowercase();
    let normalized_seed = normalize_url(seed.as_str());

    let browser = LaunchedBrowser::launch(config.headless())
        .await
        .map_err(ScanError::BrowserLaunch)?;

    let frontier = Arc::new(Mutex::new(VecDeque::from([normalized_seed.clone()])));
    let visited: Arc<DashSet<String>> = Arc::new(DashSet::new());
    visited.insert(normalized_seed);
    let found = Arc::new(AtomicUsize::new(0));
    let semaphore = Arc::new(Semaphore::new(config.max_concurrency()));
    let nav_timeout = Duration::from_secs(config.crawl_nav_timeout_secs());
    let handler_timeout = Duration::from_secs(config.crawl_handler_timeout_secs());
    let max_pages = config.max_pages();

    let mut pages = Vec::new();
    let mut in_flight: JoinSet<(String, anyhow::Result<PageLoadOutcome>)> = JoinSet::new();

    loop {
        while found.load(Ordering::Relaxed) + in_flight.len() < max_pages {
            let next = frontier.lock().pop_front();
            let Some(next_url) = next else { break };
            let permit = semaphore.clone().acquire_owned().await.expect("semaphore closed");
            let browser_handle = browser.browser();
            let url_for_task = next_url.clone();
            in_flight.spawn(async move {
                let _permit = permit;
                let result =
                    tokio::time::timeout(handler_timeout, load_page(&browser_handle, url_for_task.clone(), nav_timeout))
                        .await
                        .unwrap_or_else(|_| Err(anyhow::anyhow!("crawl handler timeout")));
                (url_for_task, result)
            });
        }

        if in_flight.is_empty() {
            break;
        }

        let Some(joined) = in_flight.join_next().await else {
            break;
        };
        let (attempted_url, result) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                warn!("crawl task panicked: {e}");
                continue;
            }
        };

        match result {
            Ok(outcome) => {
                let key = normalize_url(&outcome.final_url);
                visited.insert(key.clone());
                pages.push(PageRecord::new(
                    outcome.final_url,
                    outcome.title,
                    outcome.load_time_millis,
                ));
                found.fetch_add(1, Ordering::Relaxed);

                let pct = ((90 * found.load(Ordering::Relaxed)) / max_pages.max(1)).min(90) as u8;
                on_progress(pct, format!("Found {} page(s)", found.load(Ordering::Relaxed)));

                for link in outcome.links {
                    if let Ok(candidate) = Url::parse(&link) {
                        if should_follow(&candidate, &seed_host) {
                            let normalized = normalize_url(candidate.as_str());
                            if visited.insert(normalized.clone()) {
                                frontier.lock().push_back(normalized);
                            }
                        }
                    }
                }
            }
            Err(e) => {
                debug!("crawl load of {attempted_url} failed: {e}");
                // URL stays marked visited; swallowed per §4.1 failure semantics.
            }
        }
    }

    browser.shutdown().await;
    on_progress(90, format!("Found {} page(s)", pages.len()));
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_never_exceeds_ninety_before_close() {
        let max_pages = 20usize;
        for found in 0..=max_pages {
            let pct = ((90 * found) / max_pages).min(90);
            assert!(pct <= 90);
        }
    }
}
