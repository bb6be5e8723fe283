//! External interface surface the core exposes to its HTTP collaborator
//! (§6): `start_scan`, `subscribe_progress`, `get_report`.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::analytics::{AnalyticsSink, JsonlFileAnalyticsSink, NoopAnalyticsSink};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::model::{Report, Scan, ScanId, ScanStatus};
use crate::orchestrator;
use crate::progress::{ProgressBus, SubscriberId};
use crate::prompt::PromptCache;
use crate::registry::ScanRegistry;

const LLM_API_KEY_ENV: &str = "SCAN_ENGINE_LLM_API_KEY";
const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone)]
pub enum ReportStatus {
    Running,
    Complete(Report),
    Error(String),
}

/// Facade over the registry, progress bus, and prompt cache; owns the
/// config and analytics sink for every scan it spawns.
pub struct ScanService {
    registry: Arc<ScanRegistry>,
    cache: Arc<PromptCache>,
    config: ScanConfig,
    analytics: Arc<dyn AnalyticsSink>,
}

/// Absolute, http(s), with a hostname carrying at least two
/// dot-separated parts whose TLD is at least two characters (§6).
fn validate_seed_url(seed_url: &str) -> Result<(), ScanError> {
    let parsed = url::Url::parse(seed_url).map_err(|e| ScanError::InvalidSeedUrl(e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ScanError::InvalidSeedUrl("scheme must be http or https".to_string()));
    }
    let host = parsed.host_str().ok_or_else(|| ScanError::InvalidSeedUrl("missing host".to_string()))?;
    let mut parts = host.split('.');
    let label_count = parts.clone().count();
    let tld_len = parts.next_back().map(str::len).unwrap_or(0);
    if label_count < 2 || tld_len < 2 {
        return Err(ScanError::InvalidSeedUrl(format!("hostname '{host}' has no valid TLD")));
    }
    Ok(())
}

impl ScanService {
    pub async fn new(config: ScanConfig, analytics: Arc<dyn AnalyticsSink>) -> Arc<Self> {
        let cache_path = config.cache_file_path().to_path_buf();
        Arc::new(Self {
            registry: ScanRegistry::new(),
            cache: PromptCache::load(cache_path).await,
            config,
            analytics,
        })
    }

    /// Builds the analytics sink from `config.analytics_file_path()`: a
    /// `JsonlFileAnalyticsSink` when the path is set, otherwise a no-op.
    pub async fn with_defaults(config: ScanConfig) -> Arc<Self> {
        let analytics: Arc<dyn AnalyticsSink> = match config.analytics_file_path() {
            Some(path) => Arc::new(JsonlFileAnalyticsSink::new(path.clone())),
            None => Arc::new(NoopAnalyticsSink),
        };
        Self::new(config, analytics).await
    }

    /// Validates `seed_url`, rejects if a scan is already running, then
    /// spawns the pipeline as a background task and returns immediately.
    pub fn start_scan(self: &Arc<Self>, seed_url: &str) -> Result<ScanId, ScanError> {
        validate_seed_url(seed_url)?;
        if self.registry.has_running_scan() {
            return Err(ScanError::ScanAlreadyRunning);
        }

        let id = Uuid::new_v4().to_string();
        let scan = Scan::new(id.clone(), seed_url);
        let bus = ProgressBus::new();
        self.registry.insert(scan, bus);

        let this = self.clone();
        let seed_url = seed_url.to_string();
        let scan_id = id.clone();
        tokio::spawn(async move {
            this.run_scan(scan_id, seed_url).await;
        });

        Ok(id)
    }

    async fn run_scan(&self, scan_id: ScanId, seed_url: String) {
        let Some(bus) = self.registry.bus(&scan_id) else { return };
        let api_key = std::env::var(LLM_API_KEY_ENV).ok();

        info!("scan {scan_id} starting for {seed_url}");
        let result = orchestrator::run(
            &seed_url,
            &self.config,
            &bus,
            self.cache.clone(),
            api_key,
            DEFAULT_LLM_ENDPOINT,
            self.analytics.as_ref(),
        )
        .await;

        match result {
            Ok(report) => {
                info!("scan {scan_id} complete: {} defect(s)", report.summary.total_defects);
                self.registry.mark_terminal(&scan_id, ScanStatus::Complete { report });
            }
            Err(e) => {
                error!("scan {scan_id} failed: {e}");
                self.registry.mark_terminal(&scan_id, ScanStatus::Error { message: e.to_string() });
            }
        }
    }

    /// Attaches `on_event`; returns the id needed to detach. Detaching is
    /// idempotent (§4.7).
    pub fn subscribe_progress(
        &self,
        scan_id: &str,
        on_event: impl Fn(&crate::model::ProgressEvent) + Send + Sync + 'static,
    ) -> Result<SubscriberId, ScanError> {
        self.registry
            .bus(scan_id)
            .map(|bus| bus.subscribe(on_event))
            .ok_or_else(|| ScanError::ScanNotFound(scan_id.to_string()))
    }

    pub fn unsubscribe_progress(&self, scan_id: &str, subscriber: SubscriberId) {
        if let Some(bus) = self.registry.bus(scan_id) {
            bus.unsubscribe(subscriber);
        }
    }

    pub fn get_report(&self, scan_id: &str) -> Result<ReportStatus, ScanError> {
        let scan = self
            .registry
            .get(scan_id)
            .ok_or_else(|| ScanError::ScanNotFound(scan_id.to_string()))?;
        let status = scan.status.lock();
        Ok(match &*status {
            ScanStatus::Running => ReportStatus::Running,
            ScanStatus::Complete { report } => ReportStatus::Complete(report.clone()),
            ScanStatus::Error { message } => ReportStatus::Error(message.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_scheme() {
        assert!(validate_seed_url("ftp://example.com").is_err());
    }

    #[test]
    fn rejects_hostname_without_tld() {
        assert!(validate_seed_url("http://localhost").is_err());
    }

    #[test]
    fn accepts_well_formed_url() {
        assert!(validate_seed_url("https://example.com/page").is_ok());
    }
}
