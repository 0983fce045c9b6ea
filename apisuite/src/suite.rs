//! `ApiSuite`: every configured adapter behind one handle.
//!
//! Adapters are built once from a [`SuiteConfig`] and share a single
//! transport. The cacheable adapters (`base2`, `merrick`) also share one
//! response cache, so a lookup cached by one process-wide suite is visible
//! to every caller holding it.

use std::sync::Arc;

use apisuite_core::observability::{TracingConfig, init_tracing};
use apisuite_core::types::HttpConfig;
use apisuite_core::{
    ApiClient, ApiSuiteError, HttpTransport, MemoryCache, ReqwestTransport, ResponseCache, Result,
};

use crate::config::SuiteConfig;

/// Shared settings handed to every adapter builder.
struct BuildContext {
    transport: Arc<dyn HttpTransport>,
    cache: Option<Arc<dyn ResponseCache>>,
    cache_ttl: Option<u64>,
}

macro_rules! suite_adapters {
    ($( $feature:literal, $name:literal => $field:ident : $client:ty, cacheable = $cacheable:literal; )*) => {
        /// Adapter names accepted under `clients` in the suite configuration.
        pub const ADAPTERS: &[&str] = &[$( #[cfg(feature = $feature)] $name, )*];

        #[derive(Default)]
        pub struct ApiSuite {
            $(
                #[cfg(feature = $feature)]
                $field: Option<$client>,
            )*
            cache: Option<Arc<dyn ResponseCache>>,
        }

        impl ApiSuite {
            $(
                #[cfg(feature = $feature)]
                #[doc = concat!("The `", $name, "` adapter, or `ResourceNotFound` when it is not configured.")]
                pub fn $field(&self) -> Result<&$client> {
                    self.$field
                        .as_ref()
                        .ok_or_else(|| ApiSuiteError::resource_not_found("ApiSuite", $name))
                }
            )*

            /// Any configured adapter by name.
            pub fn get(&self, name: &str) -> Result<&dyn ApiClient> {
                let client: Option<&dyn ApiClient> = match name {
                    $(
                        #[cfg(feature = $feature)]
                        $name => self.$field.as_ref().map(|c| c as &dyn ApiClient),
                    )*
                    _ => return Err(unknown_adapter(name)),
                };
                client.ok_or_else(|| ApiSuiteError::resource_not_found("ApiSuite", name))
            }

            /// Names of the adapters that were built, in declaration order.
            pub fn configured(&self) -> Vec<&'static str> {
                let mut names = Vec::new();
                $(
                    #[cfg(feature = $feature)]
                    {
                        if self.$field.is_some() {
                            names.push($name);
                        }
                    }
                )*
                names
            }

            fn install(&mut self, name: &str, config: apisuite_core::ClientConfig, ctx: &BuildContext) -> Result<()> {
                match name {
                    $(
                        #[cfg(feature = $feature)]
                        $name => {
                            let mut builder = <$client>::builder()
                                .config(config)
                                .with_http_transport(ctx.transport.clone());
                            if $cacheable {
                                builder = match &ctx.cache {
                                    Some(cache) => builder.with_cache(cache.clone()),
                                    None => builder.cache_enabled(false),
                                };
                                if let Some(ttl) = ctx.cache_ttl {
                                    builder = builder.cache_ttl(ttl);
                                }
                            }
                            let client = builder.build()?;
                            client.validate_config()?;
                            self.$field = Some(client);
                        }
                    )*
                    _ => return Err(unknown_adapter(name)),
                }
                tracing::debug!(adapter = name, "adapter configured");
                Ok(())
            }
        }
    };
}

suite_adapters! {
    "base2", "base2" => base2: apisuite_providers::providers::base2::Base2Client, cacheable = true;
    "merrick", "merrick" => merrick: apisuite_providers::providers::merrick::MerrickClient, cacheable = true;
    "base-platform", "base_platform" => base_platform: apisuite_providers::providers::base_platform::BasePlatformClient, cacheable = false;
    "media", "media" => media: apisuite_providers::providers::media::MediaClient, cacheable = false;
    "omeda", "omeda" => omeda: apisuite_providers::providers::omeda::OmedaClient, cacheable = false;
    "mailchimp", "mailchimp" => mailchimp: apisuite_providers::providers::mailchimp::MailchimpClient, cacheable = false;
    "openx", "openx" => openx: apisuite_providers::providers::openx::OpenXClient, cacheable = false;
    "varnish", "varnish" => varnish: apisuite_providers::providers::varnish::VarnishClient, cacheable = false;
    "brightcove", "brightcove" => brightcove: apisuite_providers::providers::brightcove::BrightcoveClient, cacheable = false;
    "youtube", "youtube" => youtube: apisuite_providers::providers::youtube::YoutubeClient, cacheable = false;
    "geocode", "geocode" => geocode: apisuite_providers::providers::geocode::GeocodeClient, cacheable = false;
    "gigya", "gigya" => gigya: apisuite_providers::providers::gigya::GigyaClient, cacheable = false;
}

fn unknown_adapter(name: &str) -> ApiSuiteError {
    ApiSuiteError::invalid_configuration(name, vec![format!("one of: {}", ADAPTERS.join(", "))])
}

impl ApiSuite {
    pub fn builder() -> ApiSuiteBuilder {
        ApiSuiteBuilder::default()
    }

    /// The response cache shared by the cacheable adapters, if caching is on.
    pub fn cache(&self) -> Option<&Arc<dyn ResponseCache>> {
        self.cache.as_ref()
    }
}

impl std::fmt::Debug for ApiSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSuite")
            .field("configured", &self.configured())
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

#[derive(Default)]
pub struct ApiSuiteBuilder {
    config: SuiteConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    cache: Option<Arc<dyn ResponseCache>>,
    tracing: Option<TracingConfig>,
}

impl ApiSuiteBuilder {
    pub fn config(mut self, config: SuiteConfig) -> Self {
        self.config = config;
        self
    }

    /// Transport shared by every adapter; defaults to reqwest built from `http`.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Cache backend for the cacheable adapters; defaults to an in-memory LRU.
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.config.http = Some(http);
        self
    }

    /// Installs a global subscriber during `build`.
    pub fn tracing(mut self, config: TracingConfig) -> Self {
        self.tracing = Some(config);
        self
    }

    pub fn build(self) -> Result<ApiSuite> {
        let Self {
            config,
            transport,
            cache,
            tracing: tracing_config,
        } = self;

        if let Some(tracing_config) = tracing_config.as_ref().or(config.tracing.as_ref()) {
            init_tracing(tracing_config)?;
        }

        let transport = match transport {
            Some(transport) => transport,
            None => {
                let http = config.http.clone().unwrap_or_default();
                Arc::new(ReqwestTransport::new(&http)?) as Arc<dyn HttpTransport>
            }
        };

        let cache = if config.cache.enabled {
            Some(cache.unwrap_or_else(|| {
                let memory = match config.cache.capacity {
                    Some(capacity) => MemoryCache::with_capacity(capacity),
                    None => MemoryCache::new(),
                };
                Arc::new(memory) as Arc<dyn ResponseCache>
            }))
        } else {
            None
        };

        let ctx = BuildContext {
            transport,
            cache: cache.clone(),
            cache_ttl: config.cache.ttl,
        };

        let mut suite = ApiSuite {
            cache,
            ..ApiSuite::default()
        };
        for name in config.client_names() {
            let options = config.client_config(name).unwrap_or_default();
            suite.install(name, options, &ctx)?;
        }
        tracing::info!(adapters = ?suite.configured(), "api suite ready");
        Ok(suite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apisuite_core::testing::ScriptedTransport;
    use serde_json::json;
    use tracing_test::traced_test;

    fn suite(config: serde_json::Value) -> Result<ApiSuite> {
        ApiSuite::builder()
            .config(SuiteConfig::from_value(config)?)
            .with_transport(Arc::new(ScriptedTransport::new()))
            .build()
    }

    #[test]
    fn builds_only_configured_adapters() {
        let suite = suite(json!({
            "clients": {
                "base2": {"host": "cms.local", "user": "svc", "key": "k"},
                "varnish": {}
            }
        }))
        .unwrap();

        assert_eq!(suite.configured(), vec!["base2", "varnish"]);
        assert!(suite.base2().is_ok());
        assert!(suite.varnish().is_ok());
        assert_eq!(suite.get("base2").unwrap().client_id(), "Base2");
        assert!(suite.cache().is_some());
    }

    #[test]
    fn unconfigured_adapter_is_resource_not_found() {
        let suite = suite(json!({"clients": {}})).unwrap();
        let Err(err) = suite.omeda() else {
            panic!("omeda was not configured");
        };
        assert!(matches!(
            err,
            ApiSuiteError::ResourceNotFound { ref resource, .. } if resource == "omeda"
        ));
        assert!(matches!(
            suite.get("merrick"),
            Err(ApiSuiteError::ResourceNotFound { .. })
        ));
    }

    #[test]
    fn unknown_adapter_name_is_invalid_configuration() {
        let err = suite(json!({"clients": {"exacttarget": {"user": "x"}}})).unwrap_err();
        match err {
            ApiSuiteError::InvalidConfiguration { client, missing } => {
                assert_eq!(client, "exacttarget");
                assert!(missing[0].contains("base2"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_required_keys_fail_the_build() {
        let err = suite(json!({"clients": {"base2": {"host": "cms.local"}}})).unwrap_err();
        assert!(matches!(err, ApiSuiteError::InvalidConfiguration { .. }));
    }

    #[test]
    fn disabled_cache_turns_off_cacheable_adapters() {
        let suite = suite(json!({
            "clients": {"base2": {"host": "cms.local", "user": "svc", "key": "k"}},
            "cache": {"enabled": false}
        }))
        .unwrap();

        assert!(suite.cache().is_none());
        let base2 = suite.get("base2").unwrap();
        assert!(!base2.as_cacheable().unwrap().cache_enabled());
    }

    #[test]
    #[traced_test]
    fn build_logs_the_configured_adapters() {
        suite(json!({"clients": {"geocode": {}}})).unwrap();
        assert!(logs_contain("api suite ready"));
        assert!(logs_contain("geocode"));
    }
}
