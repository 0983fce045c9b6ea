//! Response caching.
//!
//! The orchestrator holds an optional `ResponseCache`. Backends only see opaque
//! strings produced by [`codec`]; keys come from a [`CacheKeyStrategy`].

pub mod codec;
pub mod key;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiSuiteError;

pub use key::{CacheKeyStrategy, DefaultKeyStrategy};
pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use self::redis::RedisCache;

/// Key-value store with exists/get/set/expire semantics.
///
/// Writes are unconditional overwrites. `set` stores without expiry; the
/// orchestrator follows it with `expire` when a TTL applies.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool, ApiSuiteError>;
    async fn get(&self, key: &str) -> Result<Option<String>, ApiSuiteError>;
    async fn set(&self, key: &str, value: String) -> Result<(), ApiSuiteError>;
    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<(), ApiSuiteError>;
}

/// Caching behaviour for one call or one adapter.
#[derive(Clone)]
pub struct CachePolicy {
    pub enabled: bool,
    /// Seconds an entry lives; 0 keeps it until evicted.
    pub ttl_seconds: u64,
    pub key_strategy: Arc<dyn CacheKeyStrategy>,
}

impl CachePolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::forever()
        }
    }

    pub fn forever() -> Self {
        Self::ttl(0)
    }

    pub fn ttl(ttl_seconds: u64) -> Self {
        Self {
            enabled: true,
            ttl_seconds,
            key_strategy: Arc::new(DefaultKeyStrategy),
        }
    }

    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_key_strategy(mut self, strategy: Arc<dyn CacheKeyStrategy>) -> Self {
        self.key_strategy = strategy;
        self
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePolicy")
            .field("enabled", &self.enabled)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}
