//! Cache capability for computed pipeline reports.
//!
//! Services receive an `Arc<dyn ReportCache>` so tests can swap in a cache
//! with a zero TTL, or a different backend later.

use shared::PipelineReport;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

pub trait ReportCache: Send + Sync {
    /// A fresh report for `key`, if one is cached
    fn get(&self, key: &str) -> Option<PipelineReport>;

    fn put(&self, key: &str, report: PipelineReport);
}

/// Process-local cache whose entries expire after a fixed TTL
pub struct InMemoryReportCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, PipelineReport)>>,
}

impl InMemoryReportCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    // A panic while holding the lock leaves the map itself intact.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, (Instant, PipelineReport)>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReportCache for InMemoryReportCache {
    fn get(&self, key: &str) -> Option<PipelineReport> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some((stored_at, report)) if stored_at.elapsed() < self.ttl => Some(report.clone()),
            Some(_) => {
                debug!("Report cache entry {} expired", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: &str, report: PipelineReport) {
        self.lock().insert(key.to_string(), (Instant::now(), report));
    }
}
