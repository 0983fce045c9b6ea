//! In-process response cache.
//!
//! Bounded LRU store whose deadlines are measured on the tokio clock, so
//! paused-time tests can advance past a TTL deterministically.

use std::num::NonZeroUsize;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::ResponseCache;
use crate::defaults;
use crate::error::ApiSuiteError;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

pub struct MemoryCache {
    entries: Mutex<LruCache<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(defaults::cache::MEMORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of stored entries, expired ones included until they are touched.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    async fn live_value(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let found = entries
            .get(key)
            .map(|entry| (entry.is_live(now), entry.value.clone()));
        match found {
            Some((true, value)) => Some(value),
            Some((false, _)) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn exists(&self, key: &str) -> Result<bool, ApiSuiteError> {
        Ok(self.live_value(key).await.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ApiSuiteError> {
        Ok(self.live_value(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ApiSuiteError> {
        self.entries.lock().await.put(
            key.to_string(),
            Entry {
                value,
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<(), ApiSuiteError> {
        let mut entries = self.entries.lock().await;
        if ttl_seconds == 0 {
            entries.pop(key);
            return Ok(());
        }
        if let Some(entry) = entries.get_mut(key) {
            // A deadline past the clock's range never arrives.
            entry.expires_at = Instant::now().checked_add(Duration::from_secs(ttl_seconds));
        }
        Ok(())
    }
}
