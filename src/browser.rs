//! RAII wrapper around a launched browser instance.
//!
//! Ensures the event-handler task is aborted and the browser process is
//! killed on every exit path, including panics and early returns — the
//! crawler and the page driver each launch one of these per scan phase.

use std::sync::Arc;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub struct LaunchedBrowser {
    browser: Arc<Browser>,
    handler: Option<JoinHandle<()>>,
    user_data_dir: Option<std::path::PathBuf>,
}

impl LaunchedBrowser {
    pub async fn launch(headless: bool) -> Result<Self> {
        let (browser, handler, user_data_dir) =
            crate::browser_setup::launch_browser(headless, None)
                .await
                .context("failed to launch browser")?;
        Ok(Self {
            browser: Arc::new(browser),
            handler: Some(handler),
            user_data_dir: Some(user_data_dir),
        })
    }

    pub fn browser(&self) -> Arc<Browser> {
        self.browser.clone()
    }

    pub async fn shutdown(mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        if let Err(e) = self.browser.close().await {
            warn!("error closing browser: {e}");
        }
        if let Some(dir) = self.user_data_dir.take() {
            if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
                warn!("failed to remove browser profile dir {}: {e}", dir.display());
            }
        }
        info!("browser shut down");
    }
}

impl Drop for LaunchedBrowser {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        if let Some(dir) = self.user_data_dir.take() {
            let _ = std::fs::remove_dir_all(&dir);
        }
    }
}
