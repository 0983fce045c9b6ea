//! apisuite-core
//!
//! Vendor-agnostic request orchestration: retry, response caching,
//! classification and session bootstrapping shared by every API adapter.
#![deny(unsafe_code)]

pub mod builder;
pub mod cache;
pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod execution;
pub mod observability;
pub mod profile;
pub mod registry;
pub mod retry;
pub mod session;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod types;
pub mod utils;

pub use builder::ClientBuilder;
pub use cache::{CachePolicy, MemoryCache, ResponseCache};
pub use client::{ApiClient, Cacheable};
pub use config::ClientConfig;
pub use error::{ApiSuiteError, ErrorCategory, Result};
pub use execution::Orchestrator;
pub use execution::http::{HttpTransport, HttpTransportRequest, HttpTransportResponse, ReqwestTransport};
pub use profile::{ApiProfile, VendorFailure};
pub use registry::{Resource, ResourceRegistry};
pub use retry::RetryPolicy;
pub use session::{Authenticator, Session, SessionBootstrapper, SessionState};
pub use types::{ApiResponse, Body, ClassifiedOutcome, Method, RequestDescriptor, ResponseFormat};
pub use utils::{CancelHandle, ExecuteOptions};
