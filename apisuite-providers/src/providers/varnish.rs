//! Varnish cache purge/crawl adapter.
//!
//! Responses are returned raw: the status tells the caller whether the
//! object was purged, and nothing is cached or classified.

use std::sync::Arc;

use apisuite_core::{
    ApiProfile, ApiResponse, CachePolicy, ClientBuilder, ClientConfig, Method, Orchestrator,
    ResponseFormat, Result, RetryPolicy,
};
use reqwest::header::HeaderMap;

use crate::common;

pub const DEFAULT_HOST: &str = "localhost";

#[derive(Debug, Clone, Copy, Default)]
pub struct VarnishProfile;

impl ApiProfile for VarnishProfile {
    fn id(&self) -> &'static str {
        "Varnish"
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[Method::Purge, Method::Get, Method::Head]
    }

    fn base_url(&self, config: &ClientConfig) -> Result<String> {
        let host = common::host(config, "host");
        let host = if host.is_empty() { DEFAULT_HOST } else { &host };
        Ok(format!("http://{host}"))
    }

    fn build_headers(&self, _config: &ClientConfig, _method: Method) -> Result<HeaderMap> {
        common::headers([("Cache-Control", "no-cache"), ("Cookie", "REFRESH=true")])
    }
}

#[derive(Clone, Default)]
pub struct VarnishBuilder {
    core: ClientBuilder,
}

impl VarnishBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host (optionally with port) of the varnish instance.
    pub fn host(self, host: impl Into<String>) -> Self {
        self.option("host", host)
    }

    pub fn build(self) -> Result<VarnishClient> {
        let orchestrator = self.core.build_orchestrator(
            Arc::new(VarnishProfile),
            CachePolicy::disabled(),
            RetryPolicy::none(),
        )?;
        Ok(VarnishClient { orchestrator })
    }
}

impl_builder_common!(VarnishBuilder);

pub struct VarnishClient {
    orchestrator: Orchestrator,
}

impl_api_client!(VarnishClient);

impl VarnishClient {
    pub fn builder() -> VarnishBuilder {
        VarnishBuilder::new()
    }

    /// Evicts `endpoint` from the cache.
    pub async fn purge(&self, endpoint: &str) -> Result<ApiResponse> {
        self.send(Method::Purge, endpoint).await
    }

    /// Fetches `endpoint` with the refresh cookie so varnish re-populates it.
    pub async fn crawl(&self, endpoint: &str) -> Result<ApiResponse> {
        self.send(Method::Get, endpoint).await
    }

    async fn send(&self, method: Method, endpoint: &str) -> Result<ApiResponse> {
        let request = self
            .orchestrator
            .request(method, endpoint.trim_start_matches('/'))?
            .format(ResponseFormat::Text)
            .build()?;
        tracing::debug!(method = %method, uri = %request.request_uri(), "varnish request");
        self.orchestrator
            .send_raw(&request, self.orchestrator.retry_policy())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apisuite_core::testing::ScriptedTransport;

    #[tokio::test]
    async fn purge_sends_refresh_headers_to_localhost() {
        let transport = Arc::new(ScriptedTransport::new().with_response(200, "Purged"));
        let client = VarnishClient::builder()
            .with_http_transport(transport.clone())
            .build()
            .unwrap();
        let response = client.purge("/news/story-1?page=2").await.unwrap();
        assert_eq!(response.body, "Purged");

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Purge);
        assert_eq!(sent.url.as_str(), "http://localhost/news/story-1?page=2");
        assert_eq!(sent.headers["cache-control"], "no-cache");
        assert_eq!(sent.headers["cookie"], "REFRESH=true");
    }

    #[tokio::test]
    async fn non_success_status_is_returned_not_raised() {
        let transport = Arc::new(ScriptedTransport::new().with_response(405, "Not allowed."));
        let client = VarnishClient::builder()
            .host("cache.internal:6081")
            .with_http_transport(transport.clone())
            .build()
            .unwrap();
        let response = client.crawl("section/news").await.unwrap();
        assert_eq!(response.status, 405);
        assert_eq!(
            transport.last_request().unwrap().url.as_str(),
            "http://cache.internal:6081/section/news"
        );
    }
}
