//! In-memory preview cache keyed by the request URL exactly as received.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::MIN_SWEEP_INTERVAL;
use crate::models::PreviewResponse;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: PreviewResponse,
    expires_at: Instant,
}

/// Cheap to clone; clones share the same store.
#[derive(Debug, Clone)]
pub struct PreviewCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl PreviewCache {
    pub fn new(ttl: Duration) -> Self {
        PreviewCache {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Entries are plain values, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Live value for `key`. Expired entries are dropped and reported as a miss.
    pub fn get(&self, key: &str) -> Option<PreviewResponse> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or replace `key`, expiring `ttl` from now.
    pub fn set(&self, key: impl Into<String>, value: PreviewResponse) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.lock().insert(key.into(), entry);
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock().values().filter(|e| e.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Periodically purge expired entries so memory tracks live entries
    /// rather than every URL ever requested. Periods under a second are
    /// raised to one.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        let period = period.max(MIN_SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let removed = cache.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, "Purged expired preview cache entries");
                }
            }
        })
    }
}
