//! apisuite-providers
//!
//! One feature-gated adapter per vendor API. Each adapter declares an
//! `ApiProfile` and an endpoint catalog; retry, caching, classification and
//! session handling come from the shared orchestrator in `apisuite-core`.
#![deny(unsafe_code)]

#[macro_use]
mod macros;

#[cfg_attr(not(feature = "all-providers"), allow(dead_code))]
pub(crate) mod common;
pub mod providers;

pub use apisuite_core::{
    ApiClient, ApiSuiteError, Cacheable, CachePolicy, ClientBuilder, ClientConfig, Result,
    RetryPolicy,
};
