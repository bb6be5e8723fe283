//! Process-wide prompt cache: a single JSON file, read once at startup and
//! rewritten atomically after every mutation (§4.5 cache contract).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::ScanError;
use crate::model::CacheEntry;

pub struct PromptCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl PromptCache {
    /// Loads the backing file if present; a missing file is not an error,
    /// and a corrupt one is logged and treated as empty (§7).
    pub async fn load(path: PathBuf) -> Arc<Self> {
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<HashMap<String, CacheEntry>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    let err = ScanError::CacheCorrupt(e.to_string());
                    warn!("prompt cache at {} was corrupt, starting empty: {err}", path.display());
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                let err = ScanError::CacheIo(e);
                warn!("prompt cache at {} could not be read, starting empty: {err}", path.display());
                HashMap::new()
            }
        };
        Arc::new(Self { path, entries: Mutex::new(entries) })
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).map(|e| e.hint.clone())
    }

    /// Inserts `hint` under `key` and persists the whole table. Last writer
    /// wins under concurrent mutation; the lock serializes writers so no
    /// write is ever torn.
    pub async fn put(&self, key: String, hint: String) {
        let mut guard = self.entries.lock().await;
        guard.insert(key, CacheEntry { hint, created_at: Utc::now() });
        if let Err(e) = self.persist(&guard).await {
            warn!("failed to persist prompt cache: {e}");
        }
    }

    async fn persist(&self, entries: &HashMap<String, CacheEntry>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(std::path::Path::to_path_buf);
        if let Some(dir) = &dir {
            tokio::fs::create_dir_all(dir).await?;
        }
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let mut tmp = if let Some(dir) = dir {
                tempfile::NamedTempFile::new_in(dir)?
            } else {
                tempfile::NamedTempFile::new()?
            };
            use std::io::Write;
            tmp.write_all(json.as_bytes())?;
            tmp.persist(&path)?;
            Ok(())
        })
        .await??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PromptCache::load(dir.path().join("nope.json")).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn put_then_get_within_process() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PromptCache::load(dir.path().join("cache.json")).await;
        cache.put("k".to_string(), "hint".to_string()).await;
        assert_eq!(cache.get("k").await, Some("hint".to_string()));
    }

    #[tokio::test]
    async fn reload_from_disk_observes_prior_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let cache = PromptCache::load(path.clone()).await;
        cache.put("k".to_string(), "hint".to_string()).await;

        let reloaded = PromptCache::load(path).await;
        assert_eq!(reloaded.get("k").await, Some("hint".to_string()));
    }

    #[tokio::test]
    async fn corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        tokio::fs::write(&path, b"not json").await.unwrap();
        let cache = PromptCache::load(path).await;
        assert_eq!(cache.get("anything").await, None);
    }
}
