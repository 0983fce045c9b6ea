//! Request Orchestrator
//!
//! The one place every adapter call goes through. For each descriptor it:
//! 1. validates the adapter configuration and the HTTP verb
//! 2. looks the request up in the response cache (safe verbs only)
//! 3. bootstraps the vendor session when the adapter is login-gated
//! 4. merges profile, session and descriptor headers
//! 5. runs the transport call under the retry policy
//! 6. classifies the response
//! 7. stores successful payloads in the cache
//!
//! Concurrent misses on the same key may each reach the network; there is no
//! single-flight de-duplication.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::cache::{CachePolicy, ResponseCache, codec};
use crate::config::ClientConfig;
use crate::error::{ApiSuiteError, Result};
use crate::execution::classify::classify;
use crate::execution::http::{HttpTransport, HttpTransportRequest, merge_headers};
use crate::profile::ApiProfile;
use crate::retry::{RetryExecutor, RetryPolicy};
use crate::session::{Authenticator, SessionBootstrapper};
use crate::types::{ApiResponse, Method, RequestDescriptor, RequestDescriptorBuilder};
use crate::utils::ExecuteOptions;

pub struct Orchestrator {
    profile: Arc<dyn ApiProfile>,
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    cache: Option<Arc<dyn ResponseCache>>,
    cache_enabled: AtomicBool,
    cache_policy: CachePolicy,
    retry_policy: RetryPolicy,
    session: Option<SessionBootstrapper>,
}

impl Orchestrator {
    pub fn new(
        profile: Arc<dyn ApiProfile>,
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            profile,
            config,
            transport,
            cache: None,
            cache_enabled: AtomicBool::new(true),
            cache_policy: CachePolicy::disabled(),
            retry_policy: RetryPolicy::default(),
            session: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_optional_cache(mut self, cache: Option<Arc<dyn ResponseCache>>) -> Self {
        self.cache = cache;
        self
    }

    /// Policy used by [`execute_default`](Self::execute_default).
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Gate every call behind a session handshake.
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.session = Some(SessionBootstrapper::new(authenticator));
        self
    }

    pub fn profile(&self) -> &Arc<dyn ApiProfile> {
        &self.profile
    }

    pub fn client_id(&self) -> &'static str {
        self.profile.id()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    pub fn cache(&self) -> Option<&Arc<dyn ResponseCache>> {
        self.cache.as_ref()
    }

    pub fn cache_policy(&self) -> &CachePolicy {
        &self.cache_policy
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn session(&self) -> Option<&SessionBootstrapper> {
        self.session.as_ref()
    }

    /// Runtime switch for every cache read and write of this adapter.
    pub fn set_cache_enabled(&self, enabled: bool) {
        self.cache_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some() && self.cache_enabled.load(Ordering::Relaxed)
    }

    /// Fails with `InvalidConfiguration` naming every missing required option.
    pub fn validate(&self) -> Result<()> {
        self.config
            .require(self.profile.id(), self.profile.required_config_keys())
    }

    pub fn check_method(&self, method: Method) -> Result<()> {
        let supported = self.profile.supported_methods();
        if supported.contains(&method) {
            return Ok(());
        }
        Err(ApiSuiteError::UnsupportedMethod {
            client: self.profile.id().to_string(),
            method,
            supported: supported.to_vec(),
        })
    }

    pub fn base_url(&self) -> Result<String> {
        self.validate()?;
        self.profile.base_url(&self.config)
    }

    /// Descriptor builder for `endpoint` relative to the profile's base URL.
    pub fn request(&self, method: Method, endpoint: &str) -> Result<RequestDescriptorBuilder> {
        let url = join_url(&self.base_url()?, endpoint);
        Ok(RequestDescriptor::builder(self.profile.id(), method, url))
    }

    /// Descriptor builder for an absolute URL outside the base URL.
    pub fn request_url(&self, method: Method, url: impl Into<String>) -> RequestDescriptorBuilder {
        RequestDescriptor::builder(self.profile.id(), method, url)
    }

    /// Executes with the adapter's default policies.
    pub async fn execute_default(&self, descriptor: &RequestDescriptor) -> Result<Value> {
        self.execute(descriptor, &self.cache_policy, &self.retry_policy)
            .await
    }

    /// Executes with the adapter's retry policy and a per-call cache policy.
    pub async fn execute_cached(
        &self,
        descriptor: &RequestDescriptor,
        cache_policy: &CachePolicy,
    ) -> Result<Value> {
        self.execute(descriptor, cache_policy, &self.retry_policy)
            .await
    }

    pub async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        cache_policy: &CachePolicy,
        retry_policy: &RetryPolicy,
    ) -> Result<Value> {
        self.run(descriptor, cache_policy, retry_policy).await
    }

    /// Like [`execute`](Self::execute), bounded by a cancellation token and deadline.
    pub async fn execute_with(
        &self,
        descriptor: &RequestDescriptor,
        cache_policy: &CachePolicy,
        retry_policy: &RetryPolicy,
        options: &ExecuteOptions,
    ) -> Result<Value> {
        options
            .guard(self.run(descriptor, cache_policy, retry_policy))
            .await
    }

    /// One retried exchange without classification or caching.
    ///
    /// Any completed response is returned as-is, whatever its status.
    pub async fn send_raw(
        &self,
        descriptor: &RequestDescriptor,
        retry_policy: &RetryPolicy,
    ) -> Result<ApiResponse> {
        self.validate()?;
        self.check_method(descriptor.method())?;
        self.exchange(descriptor, retry_policy).await
    }

    async fn run(
        &self,
        descriptor: &RequestDescriptor,
        cache_policy: &CachePolicy,
        retry_policy: &RetryPolicy,
    ) -> Result<Value> {
        self.validate()?;
        self.check_method(descriptor.method())?;

        let cache = self
            .cache
            .as_ref()
            .filter(|_| self.cache_enabled() && cache_policy.enabled)
            .filter(|_| descriptor.method().is_safe());
        let key = cache.map(|_| cache_policy.key_strategy.cache_key(descriptor));

        if let (Some(cache), Some(key)) = (cache, key.as_deref())
            && let Some(hit) = cache_lookup(cache.as_ref(), key).await
        {
            return Ok(hit);
        }

        let mut response = self.exchange(descriptor, retry_policy).await?;
        let outcome = classify(self.profile.as_ref(), descriptor, &mut response);
        tracing::debug!(
            client = self.profile.id(),
            status = response.status,
            success = outcome.is_success(),
            "response classified"
        );
        let payload = outcome.into_result()?;

        if let (Some(cache), Some(key)) = (cache, key.as_deref()) {
            cache_store(cache.as_ref(), key, &payload, cache_policy.ttl_seconds).await;
        }
        Ok(payload)
    }

    async fn exchange(
        &self,
        descriptor: &RequestDescriptor,
        retry_policy: &RetryPolicy,
    ) -> Result<ApiResponse> {
        let mut headers = self
            .profile
            .build_headers(&self.config, descriptor.method())?;
        if let Some(bootstrapper) = &self.session {
            let session = bootstrapper
                .ensure_authenticated(self.transport.as_ref())
                .await?;
            bootstrapper.apply(&session, &mut headers)?;
        }
        let headers = merge_headers(headers, descriptor.headers());
        let request = HttpTransportRequest::from_descriptor(descriptor, headers)?;

        let method = descriptor.method();
        let response = RetryExecutor::new(retry_policy)
            .execute(method, |attempt| {
                let request = request.clone();
                async move {
                    tracing::debug!(
                        client = self.profile.id(),
                        method = %method,
                        uri = %descriptor.request_uri(),
                        attempt = attempt + 1,
                        "sending request"
                    );
                    self.transport.send(request).await
                }
            })
            .await?;

        if response.status == 401
            && let Some(bootstrapper) = &self.session
        {
            bootstrapper.invalidate().await;
        }

        let body = response.text();
        Ok(ApiResponse::new(response.status, response.headers, body))
    }
}

async fn cache_lookup(cache: &dyn ResponseCache, key: &str) -> Option<Value> {
    let raw = match cache.exists(key).await {
        Ok(false) => None,
        Ok(true) => match cache.get(key).await {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(key, error = %error, "cache read failed, treating as miss");
                None
            }
        },
        Err(error) => {
            tracing::warn!(key, error = %error, "cache read failed, treating as miss");
            None
        }
    };

    let raw = match raw {
        Some(raw) => raw,
        None => {
            tracing::debug!(key, "cache miss");
            return None;
        }
    };
    match codec::decode(&raw) {
        Ok(value) => {
            tracing::debug!(key, "cache hit");
            Some(value)
        }
        Err(error) => {
            tracing::warn!(key, error = %error, "undecodable cache entry, treating as miss");
            None
        }
    }
}

async fn cache_store(cache: &dyn ResponseCache, key: &str, payload: &Value, ttl_seconds: u64) {
    let result = async {
        cache.set(key, codec::encode(payload)?).await?;
        if ttl_seconds > 0 {
            cache.expire(key, ttl_seconds).await?;
        }
        Ok::<_, ApiSuiteError>(())
    }
    .await;
    if let Err(error) = result {
        tracing::warn!(key, error = %error, "cache write failed");
    }
}

/// Joins a base URL and an endpoint with exactly one slash between them.
pub fn join_url(base: &str, endpoint: &str) -> String {
    if endpoint.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKeyStrategy, DefaultKeyStrategy, MemoryCache};
    use crate::profile::VendorFailure;
    use crate::session::Session;
    use crate::testing::ScriptedTransport;
    use crate::utils::CancelHandle;
    use async_trait::async_trait;
    use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
    use secrecy::{ExposeSecret, SecretString};
    use serde_json::json;
    use std::time::Duration;
    use tracing_test::traced_test;

    struct Cms;

    impl ApiProfile for Cms {
        fn id(&self) -> &'static str {
            "Cms"
        }
        fn required_config_keys(&self) -> &'static [&'static str] {
            &["host", "key"]
        }
        fn supported_methods(&self) -> &'static [Method] {
            &[Method::Get, Method::Post]
        }
        fn base_url(&self, config: &ClientConfig) -> Result<String> {
            Ok(format!("http://{}/api", config.get_or("host", "")))
        }
        fn build_headers(&self, config: &ClientConfig, _method: Method) -> Result<HeaderMap> {
            let mut headers = HeaderMap::new();
            headers.insert("x-key", HeaderValue::from_str(config.get_or("key", ""))?);
            Ok(headers)
        }
        fn failure_indicator(&self, payload: &Value) -> Option<VendorFailure> {
            let status = payload.get("status").and_then(Value::as_i64).unwrap_or(0);
            (status == 0).then(|| VendorFailure::new("Invalid status received."))
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::new().with("host", "cms.local").with("key", "k1")
    }

    fn orchestrator(transport: Arc<ScriptedTransport>) -> Orchestrator {
        Orchestrator::new(Arc::new(Cms), config(), transport)
    }

    fn get(orch: &Orchestrator) -> RequestDescriptor {
        orch.request(Method::Get, "content/1")
            .unwrap()
            .query_param("b", 2)
            .query_param("a", 1)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn retryable_get_runs_n_plus_one_attempts_and_surfaces_first_error() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_error(ApiSuiteError::NetworkError("first".into()))
                .with_error(ApiSuiteError::NetworkError("second".into()))
                .with_error(ApiSuiteError::NetworkError("third".into()))
                .repeat_error(ApiSuiteError::NetworkError("last".into())),
        );
        let orch = orchestrator(transport.clone());
        let err = orch
            .execute(&get(&orch), &CachePolicy::disabled(), &RetryPolicy::new().with_max_retries(3))
            .await
            .unwrap_err();
        assert_eq!(err, ApiSuiteError::NetworkError("first".into()));
        assert_eq!(transport.request_count(), 4);
    }

    #[tokio::test]
    async fn post_gets_a_single_attempt() {
        let transport =
            Arc::new(ScriptedTransport::new().repeat_error(ApiSuiteError::NetworkError("down".into())));
        let orch = orchestrator(transport.clone());
        let post = orch
            .request(Method::Post, "content")
            .unwrap()
            .json(json!({"title": "x"}))
            .build()
            .unwrap();
        let err = orch
            .execute(&post, &CachePolicy::forever(), &RetryPolicy::new().with_max_retries(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiSuiteError::NetworkError(_)));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn profile_headers_are_sent_and_descriptor_headers_win() {
        let transport = Arc::new(ScriptedTransport::new().with_json(200, json!({"status": 1})));
        let orch = orchestrator(transport.clone());
        let desc = orch
            .request(Method::Get, "/content/1")
            .unwrap()
            .header("X-Key", "override")
            .build()
            .unwrap();
        orch.execute_default(&desc).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url.as_str(), "http://cms.local/api/content/1");
        assert_eq!(sent.headers.get("x-key").unwrap(), "override");
    }

    #[tokio::test]
    async fn cached_entry_short_circuits_the_transport() {
        let transport = Arc::new(ScriptedTransport::new());
        let cache = Arc::new(MemoryCache::new());
        let orch = orchestrator(transport.clone()).with_cache(cache.clone());
        let desc = get(&orch);
        let key = DefaultKeyStrategy.cache_key(&desc);
        cache
            .set(&key, json!({"status": 1, "content": [1, 2]}).to_string())
            .await
            .unwrap();

        let payload = orch
            .execute(&desc, &CachePolicy::forever(), &RetryPolicy::default())
            .await
            .unwrap();
        assert_eq!(payload, json!({"status": 1, "content": [1, 2]}));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn success_is_cached_for_later_calls() {
        let transport = Arc::new(ScriptedTransport::new().with_json(200, json!({"status": 1})));
        let orch = orchestrator(transport.clone()).with_cache(Arc::new(MemoryCache::new()));

        for _ in 0..3 {
            let payload = orch
                .execute(&get(&orch), &CachePolicy::forever(), &RetryPolicy::default())
                .await
                .unwrap();
            assert_eq!(payload, json!({"status": 1}));
        }
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn failures_and_unsafe_methods_are_never_cached() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_json(404, json!({"errors": ["missing"]}))
                .repeat_response(200, r#"{"status": 1}"#),
        );
        let cache = Arc::new(MemoryCache::new());
        let orch = orchestrator(transport.clone()).with_cache(cache.clone());

        let err = orch
            .execute(&get(&orch), &CachePolicy::forever(), &RetryPolicy::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert!(cache.is_empty().await);

        let post = orch.request(Method::Post, "content").unwrap().build().unwrap();
        orch.execute(&post, &CachePolicy::forever(), &RetryPolicy::default())
            .await
            .unwrap();
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_bounds_the_memoization_window() {
        let transport = Arc::new(ScriptedTransport::new().repeat_response(200, r#"{"status": 1}"#));
        let orch = orchestrator(transport.clone()).with_cache(Arc::new(MemoryCache::new()));
        let policy = CachePolicy::ttl(60);

        orch.execute(&get(&orch), &policy, &RetryPolicy::default()).await.unwrap();
        tokio::time::advance(Duration::from_secs(59)).await;
        orch.execute(&get(&orch), &policy, &RetryPolicy::default()).await.unwrap();
        assert_eq!(transport.request_count(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        orch.execute(&get(&orch), &policy, &RetryPolicy::default()).await.unwrap();
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_never_expires() {
        let transport = Arc::new(ScriptedTransport::new().repeat_response(200, r#"{"status": 1}"#));
        let orch = orchestrator(transport.clone()).with_cache(Arc::new(MemoryCache::new()));

        orch.execute(&get(&orch), &CachePolicy::forever(), &RetryPolicy::default())
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;
        orch.execute(&get(&orch), &CachePolicy::forever(), &RetryPolicy::default())
            .await
            .unwrap();
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn huge_ttl_is_served_from_cache() {
        let transport = Arc::new(ScriptedTransport::new().repeat_response(200, r#"{"status": 1}"#));
        let orch = orchestrator(transport.clone()).with_cache(Arc::new(MemoryCache::new()));
        let policy = CachePolicy::ttl(u64::MAX);

        orch.execute(&get(&orch), &policy, &RetryPolicy::default()).await.unwrap();
        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;
        orch.execute(&get(&orch), &policy, &RetryPolicy::default()).await.unwrap();
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn runtime_switch_bypasses_cache() {
        let transport = Arc::new(ScriptedTransport::new().repeat_response(200, r#"{"status": 1}"#));
        let orch = orchestrator(transport.clone()).with_cache(Arc::new(MemoryCache::new()));
        orch.set_cache_enabled(false);
        assert!(!orch.cache_enabled());

        for _ in 0..2 {
            orch.execute(&get(&orch), &CachePolicy::forever(), &RetryPolicy::default())
                .await
                .unwrap();
        }
        assert_eq!(transport.request_count(), 2);
    }

    struct BrokenCache;

    #[async_trait]
    impl ResponseCache for BrokenCache {
        async fn exists(&self, _key: &str) -> Result<bool> {
            Err(ApiSuiteError::CacheError("connection refused".into()))
        }
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(ApiSuiteError::CacheError("connection refused".into()))
        }
        async fn set(&self, _key: &str, _value: String) -> Result<()> {
            Err(ApiSuiteError::CacheError("connection refused".into()))
        }
        async fn expire(&self, _key: &str, _ttl_seconds: u64) -> Result<()> {
            Err(ApiSuiteError::CacheError("connection refused".into()))
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn cache_backend_failures_do_not_fail_the_call() {
        let transport = Arc::new(ScriptedTransport::new().with_json(200, json!({"status": 1})));
        let orch = orchestrator(transport.clone()).with_cache(Arc::new(BrokenCache));
        let payload = orch
            .execute(&get(&orch), &CachePolicy::ttl(30), &RetryPolicy::default())
            .await
            .unwrap();
        assert_eq!(payload, json!({"status": 1}));
        assert_eq!(transport.request_count(), 1);
        assert!(logs_contain("cache read failed"));
        assert!(logs_contain("cache write failed"));
    }

    #[tokio::test]
    async fn classification_boundaries() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_response(199, "{}")
                .with_json(200, json!({"status": 0}))
                .with_json(404, json!({"errors": ["No content found"]}))
                .with_response(500, "<html>oops</html>")
                .with_response(200, "not json"),
        );
        let orch = orchestrator(transport.clone());
        let desc = get(&orch);
        let cache_policy = CachePolicy::disabled();
        let retry_policy = RetryPolicy::default();
        let run = || orch.execute(&desc, &cache_policy, &retry_policy);

        assert!(matches!(run().await.unwrap_err(), ApiSuiteError::ServerError { status: 199, .. }));
        let flagged = run().await.unwrap_err();
        assert!(matches!(flagged, ApiSuiteError::ClientError { status: 200, .. }));
        let not_found = run().await.unwrap_err();
        assert_eq!(not_found.vendor_errors(), ["No content found".to_string()]);
        assert!(matches!(run().await.unwrap_err(), ApiSuiteError::ServerError { status: 500, .. }));
        assert!(matches!(run().await.unwrap_err(), ApiSuiteError::ParseError(_)));
        // Classified errors are not transport failures, so nothing was retried.
        assert_eq!(transport.request_count(), 5);
    }

    #[tokio::test]
    async fn invalid_configuration_and_method_fail_before_io() {
        let transport = Arc::new(ScriptedTransport::new());
        let orch = Orchestrator::new(Arc::new(Cms), ClientConfig::new().with("key", ""), transport.clone());
        let err = orch.request(Method::Get, "content").unwrap_err();
        assert_eq!(
            err,
            ApiSuiteError::invalid_configuration("Cms", vec!["host".into(), "key".into()])
        );

        let orch = orchestrator(transport.clone());
        let delete = orch.request(Method::Delete, "content/1").unwrap().build().unwrap();
        let err = orch.execute_default(&delete).await.unwrap_err();
        assert!(matches!(err, ApiSuiteError::UnsupportedMethod { method: Method::Delete, .. }));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn cancelled_call_does_no_io() {
        let transport = Arc::new(ScriptedTransport::new().repeat_response(200, r#"{"status": 1}"#));
        let orch = orchestrator(transport.clone());
        let handle = CancelHandle::new();
        handle.cancel();
        let err = orch
            .execute_with(
                &get(&orch),
                &CachePolicy::disabled(),
                &RetryPolicy::default(),
                &ExecuteOptions::new().with_cancel(&handle),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiSuiteError::Cancelled(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn send_raw_returns_unclassified_response() {
        let transport = Arc::new(ScriptedTransport::new().with_response(503, "busy"));
        let orch = orchestrator(transport);
        let raw = orch.send_raw(&get(&orch), &RetryPolicy::none()).await.unwrap();
        assert_eq!(raw.status, 503);
        assert_eq!(raw.body, "busy");
    }

    struct CookieLogin;

    #[async_trait]
    impl Authenticator for CookieLogin {
        fn probe_request(&self) -> Result<HttpTransportRequest> {
            Ok(HttpTransportRequest {
                method: Method::Put,
                url: "http://cms.local/api/session/validate".parse()?,
                headers: HeaderMap::new(),
                body: None,
            })
        }

        async fn login(&self, transport: &dyn HttpTransport) -> Result<SecretString> {
            let response = transport
                .send(HttpTransportRequest {
                    method: Method::Post,
                    url: "http://cms.local/login".parse()?,
                    headers: HeaderMap::new(),
                    body: None,
                })
                .await?;
            Ok(SecretString::from(response.text()))
        }

        fn apply(&self, session: &Session, headers: &mut HeaderMap) -> Result<()> {
            if let Some(token) = session.material() {
                headers.insert(
                    COOKIE,
                    HeaderValue::from_str(&format!("token={}", token.expose_secret()))?,
                );
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn session_bootstrap_runs_once_and_is_reused() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_response(401, "")
                .with_response(200, "t0k3n")
                .with_response(200, "")
                .with_json(200, json!({"status": 1}))
                .with_json(200, json!({"status": 1})),
        );
        let orch = orchestrator(transport.clone()).with_authenticator(Arc::new(CookieLogin));

        orch.execute_default(&get(&orch)).await.unwrap();
        assert_eq!(
            transport.request_lines(),
            vec![
                "PUT http://cms.local/api/session/validate",
                "POST http://cms.local/login",
                "PUT http://cms.local/api/session/validate",
                "GET http://cms.local/api/content/1?b=2&a=1",
            ]
        );
        let real = transport.last_request().unwrap();
        assert_eq!(real.headers.get(COOKIE).unwrap(), "token=t0k3n");

        orch.execute_default(&get(&orch)).await.unwrap();
        assert_eq!(transport.request_count(), 5);
    }

    #[tokio::test]
    async fn unauthorized_response_invalidates_the_session() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_response(200, "")
                .with_json(401, json!({"errors": ["expired"]})),
        );
        let orch = orchestrator(transport.clone()).with_authenticator(Arc::new(CookieLogin));
        let err = orch.execute_default(&get(&orch)).await.unwrap_err();
        assert!(err.is_auth_error());
        let state = orch.session().unwrap().state().await;
        assert_eq!(state, crate::session::SessionState::Unauthenticated);
    }

    #[test]
    fn join_url_uses_a_single_slash() {
        assert_eq!(join_url("http://h/api/", "/x"), "http://h/api/x");
        assert_eq!(join_url("http://h/api", "x"), "http://h/api/x");
        assert_eq!(join_url("http://h/api", ""), "http://h/api");
    }
}
