//! Shared adapter builder core.
//!
//! Every vendor builder wraps a `ClientBuilder` so that transport, HTTP,
//! cache and retry settings behave the same across adapters. The vendor
//! builder only adds typed setters for its own configuration keys.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CachePolicy, ResponseCache};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::execution::Orchestrator;
use crate::execution::http::{HttpTransport, ReqwestTransport};
use crate::profile::ApiProfile;
use crate::retry::RetryPolicy;
use crate::types::HttpConfig;

#[derive(Clone, Default)]
pub struct ClientBuilder {
    /// Vendor options (`host`, credentials, ...).
    pub config: ClientConfig,
    /// Settings for the default reqwest transport.
    pub http_config: HttpConfig,
    /// Custom reqwest client (takes precedence over `http_config`).
    pub http_client: Option<reqwest::Client>,
    /// Custom transport (takes precedence over everything else).
    pub http_transport: Option<Arc<dyn HttpTransport>>,
    pub cache: Option<Arc<dyn ResponseCache>>,
    pub cache_enabled: Option<bool>,
    pub cache_ttl: Option<u64>,
    pub cache_policy: Option<CachePolicy>,
    pub retry_policy: Option<RetryPolicy>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Vendor options
    // ========================================================================

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.set(key, value);
        self
    }

    /// Merges `config` into the current options; later values win.
    pub fn config(mut self, config: ClientConfig) -> Self {
        for (key, value) in config {
            self.config.set(key, value);
        }
        self
    }

    // ========================================================================
    // HTTP
    // ========================================================================

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http_config.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.http_config.user_agent = Some(user_agent.into());
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.http_config.proxy = Some(proxy.into());
        self
    }

    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn with_http_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.http_transport = Some(transport);
        self
    }

    // ========================================================================
    // Cache and retry
    // ========================================================================

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = Some(enabled);
        self
    }

    /// Overrides the TTL of the adapter's default cache policy.
    pub fn cache_ttl(mut self, ttl_seconds: u64) -> Self {
        self.cache_ttl = Some(ttl_seconds);
        self
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = Some(policy);
        self
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        let policy = self.retry_policy.take().unwrap_or_default();
        self.retry_policy = Some(policy.with_max_retries(max_retries));
        self
    }

    // ========================================================================
    // Build helpers
    // ========================================================================

    pub fn build_transport(&self) -> Result<Arc<dyn HttpTransport>> {
        if let Some(transport) = &self.http_transport {
            return Ok(transport.clone());
        }
        if let Some(client) = &self.http_client {
            return Ok(Arc::new(ReqwestTransport::with_client(client.clone())));
        }
        Ok(Arc::new(ReqwestTransport::new(&self.http_config)?))
    }

    /// Builds the orchestrator, layering overrides on the adapter defaults.
    pub fn build_orchestrator(
        &self,
        profile: Arc<dyn ApiProfile>,
        default_cache: CachePolicy,
        default_retry: RetryPolicy,
    ) -> Result<Orchestrator> {
        let mut cache_policy = self.cache_policy.clone().unwrap_or(default_cache);
        if let Some(ttl) = self.cache_ttl {
            cache_policy = cache_policy.with_ttl(ttl);
        }
        let retry_policy = self.retry_policy.clone().unwrap_or(default_retry);

        let orchestrator = Orchestrator::new(profile, self.config.clone(), self.build_transport()?)
            .with_optional_cache(self.cache.clone())
            .with_cache_policy(cache_policy)
            .with_retry_policy(retry_policy);
        if let Some(enabled) = self.cache_enabled {
            orchestrator.set_cache_enabled(enabled);
        }
        Ok(orchestrator)
    }
}
