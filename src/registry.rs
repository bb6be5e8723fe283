//! Process-wide scan registry: add and status-transition only, never
//! removal (§5 shared resources).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::model::{Scan, ScanId, ScanStatus};
use crate::progress::ProgressBus;

pub struct ScanRegistry {
    scans: Mutex<HashMap<ScanId, Arc<Scan>>>,
    buses: Mutex<HashMap<ScanId, Arc<ProgressBus>>>,
}

impl ScanRegistry {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            scans: Mutex::new(HashMap::new()),
            buses: Mutex::new(HashMap::new()),
        })
    }

    pub fn insert(&self, scan: Arc<Scan>, bus: Arc<ProgressBus>) {
        let id = scan.id.clone();
        self.scans.lock().insert(id.clone(), scan);
        self.buses.lock().insert(id, bus);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<Scan>> {
        self.scans.lock().get(id).cloned()
    }

    #[must_use]
    pub fn bus(&self, id: &str) -> Option<Arc<ProgressBus>> {
        self.buses.lock().get(id).cloned()
    }

    /// True if some scan is currently in the `running` state — the core
    /// allows only one scan at a time, process-wide.
    #[must_use]
    pub fn has_running_scan(&self) -> bool {
        self.scans.lock().values().any(|s| !s.is_terminal())
    }

    pub fn mark_terminal(&self, id: &str, status: ScanStatus) {
        if let Some(scan) = self.get(id) {
            *scan.status.lock() = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_registry_has_no_running_scan() {
        let registry = ScanRegistry::new();
        assert!(!registry.has_running_scan());
    }

    #[test]
    fn inserted_scan_is_running_until_marked_terminal() {
        let registry = ScanRegistry::new();
        let scan = Scan::new("id1".to_string(), "http://site/");
        registry.insert(scan.clone(), ProgressBus::new());

        assert!(registry.has_running_scan());
        registry.mark_terminal("id1", ScanStatus::Error { message: "boom".to_string() });
        assert!(!registry.has_running_scan());
    }
}
