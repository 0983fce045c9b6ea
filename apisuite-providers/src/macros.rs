//! Provider-side macros.

/// Delegates the shared builder surface to a `core: ClientBuilder` field.
macro_rules! impl_builder_common {
    ($builder:ty) => {
        impl $builder {
            /// Set a raw configuration option.
            pub fn option(
                mut self,
                key: impl Into<String>,
                value: impl Into<String>,
            ) -> Self {
                self.core = self.core.option(key, value);
                self
            }

            /// Merge a whole configuration map.
            pub fn config(mut self, config: apisuite_core::ClientConfig) -> Self {
                self.core = self.core.config(config);
                self
            }

            pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
                self.core = self.core.timeout(timeout);
                self
            }

            pub fn connect_timeout(mut self, timeout: std::time::Duration) -> Self {
                self.core = self.core.connect_timeout(timeout);
                self
            }

            pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
                self.core = self.core.user_agent(user_agent);
                self
            }

            pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
                self.core = self.core.proxy(proxy);
                self
            }

            pub fn with_http_config(mut self, config: apisuite_core::types::HttpConfig) -> Self {
                self.core = self.core.http_config(config);
                self
            }

            pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
                self.core = self.core.with_http_client(client);
                self
            }

            pub fn with_http_transport(
                mut self,
                transport: std::sync::Arc<dyn apisuite_core::HttpTransport>,
            ) -> Self {
                self.core = self.core.with_http_transport(transport);
                self
            }

            pub fn with_cache(
                mut self,
                cache: std::sync::Arc<dyn apisuite_core::ResponseCache>,
            ) -> Self {
                self.core = self.core.with_cache(cache);
                self
            }

            pub fn cache_enabled(mut self, enabled: bool) -> Self {
                self.core = self.core.cache_enabled(enabled);
                self
            }

            pub fn cache_ttl(mut self, ttl_seconds: u64) -> Self {
                self.core = self.core.cache_ttl(ttl_seconds);
                self
            }

            pub fn with_cache_policy(mut self, policy: apisuite_core::CachePolicy) -> Self {
                self.core = self.core.with_cache_policy(policy);
                self
            }

            pub fn with_retry(mut self, policy: apisuite_core::RetryPolicy) -> Self {
                self.core = self.core.with_retry(policy);
                self
            }

            pub fn max_retries(mut self, max_retries: u32) -> Self {
                self.core = self.core.max_retries(max_retries);
                self
            }
        }
    };
}

/// `ApiClient` impl for a struct holding an `orchestrator` field.
macro_rules! impl_api_client {
    ($client:ty) => {
        impl apisuite_core::ApiClient for $client {
            fn orchestrator(&self) -> &apisuite_core::Orchestrator {
                &self.orchestrator
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    };
    ($client:ty, cacheable) => {
        impl apisuite_core::ApiClient for $client {
            fn orchestrator(&self) -> &apisuite_core::Orchestrator {
                &self.orchestrator
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_cacheable(&self) -> Option<&dyn apisuite_core::Cacheable> {
                Some(self)
            }
        }

        impl apisuite_core::Cacheable for $client {}
    };
}
