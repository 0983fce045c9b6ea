//! # apisuite
//!
//! Clients for the vendor APIs behind a publishing stack: the Base2 and
//! Merrick CMS APIs, the Base platform and media services, Omeda audience
//! data, Mailchimp, the OpenX ad server, Varnish purges, Brightcove and
//! YouTube video catalogs, Google geocoding and Gigya social login.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **One orchestrator**: every adapter shares request building, retry,
//!   response caching and error classification from `apisuite-core`.
//! - **Thin adapters**: a vendor is a profile (base URL, headers, failure
//!   rules) plus a typed endpoint catalog.
//! - **Shared cache**: the CMS adapters read through one cache backend,
//!   in-memory by default or Redis with the `redis` feature.
//! - **Pluggable transport**: swap reqwest for any `HttpTransport`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apisuite::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SuiteConfig::from_json_str(r#"{
//!         "clients": {
//!             "base2": { "host": "cms.example.com", "user": "svc", "key": "secret" }
//!         }
//!     }"#)?;
//!     let suite = ApiSuite::builder().config(config).build()?;
//!
//!     let article = suite.base2()?.content_lookup(["1024"]).await?;
//!     println!("{article}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod suite;

pub use config::{CacheSettings, SuiteConfig};
pub use suite::{ADAPTERS, ApiSuite, ApiSuiteBuilder};

pub use apisuite_core as core;
pub use apisuite_providers::providers;

pub use apisuite_core::{ApiClient, ApiSuiteError, Cacheable, ClientConfig, Result};

pub mod prelude {
    //! Common imports: the suite, its config, errors and the shared policies.
    pub use crate::{ApiSuite, CacheSettings, SuiteConfig};
    pub use apisuite_core::observability::{OutputFormat, TracingConfig};
    pub use apisuite_core::types::HttpConfig;
    pub use apisuite_core::{
        ApiClient, ApiResponse, ApiSuiteError, CachePolicy, Cacheable, ClientConfig,
        ErrorCategory, HttpTransport, MemoryCache, ResponseCache, Result, RetryPolicy,
    };
    #[cfg(feature = "redis")]
    pub use apisuite_core::cache::RedisCache;
}
