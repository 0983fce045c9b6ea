//! Base platform search API adapter.
//!
//! JSON search requests against the platform API. Nothing is cached.

use std::sync::Arc;

use apisuite_core::{
    ApiProfile, CachePolicy, ClientBuilder, ClientConfig, Method, Orchestrator, Result,
    RetryPolicy,
};
use reqwest::header::HeaderMap;
use serde_json::{Value, json};

use crate::common;

#[derive(Debug, Clone, Copy, Default)]
pub struct BasePlatformProfile;

impl ApiProfile for BasePlatformProfile {
    fn id(&self) -> &'static str {
        "BasePlatform"
    }

    fn required_config_keys(&self) -> &'static [&'static str] {
        &["host"]
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[Method::Get, Method::Post]
    }

    fn base_url(&self, config: &ClientConfig) -> Result<String> {
        Ok(format!("http://{}/api/2.0rcpi", common::host(config, "host")))
    }

    fn build_headers(&self, _config: &ClientConfig, _method: Method) -> Result<HeaderMap> {
        common::headers([("Content-Type", "application/json")])
    }
}

#[derive(Clone, Default)]
pub struct BasePlatformBuilder {
    core: ClientBuilder,
}

impl BasePlatformBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(self, host: impl Into<String>) -> Self {
        self.option("host", host)
    }

    pub fn build(self) -> Result<BasePlatformClient> {
        let orchestrator = self.core.build_orchestrator(
            Arc::new(BasePlatformProfile),
            CachePolicy::disabled(),
            RetryPolicy::default(),
        )?;
        Ok(BasePlatformClient { orchestrator })
    }
}

impl_builder_common!(BasePlatformBuilder);

pub struct BasePlatformClient {
    orchestrator: Orchestrator,
}

impl_api_client!(BasePlatformClient);

impl BasePlatformClient {
    pub fn builder() -> BasePlatformBuilder {
        BasePlatformBuilder::new()
    }

    /// Query-string search over contracts, optionally limited to `fields`.
    pub async fn contracts_lookup(&self, query_string: &str, fields: &[&str]) -> Result<Value> {
        let mut builder = self
            .orchestrator
            .request(Method::Post, "search/contracts/contract")?
            .json(json!({
                "data": {"query": {"query_string": {"query": query_string}}}
            }));
        if !fields.is_empty() {
            builder = builder.query_param("include", fields.join(","));
        }
        self.orchestrator.execute_default(&builder.build()?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apisuite_core::testing::ScriptedTransport;

    #[tokio::test]
    async fn contract_search_posts_a_query_document() {
        let transport = Arc::new(ScriptedTransport::new().with_json(200, json!({"data": []})));
        let client = BasePlatformClient::builder()
            .host("platform.local")
            .with_http_transport(transport.clone())
            .build()
            .unwrap();
        client.contracts_lookup("acme*", &["name", "status"]).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(
            sent.url.as_str(),
            "http://platform.local/api/2.0rcpi/search/contracts/contract?include=name%2Cstatus"
        );
        assert_eq!(sent.headers.get("content-type").unwrap(), "application/json");
        let body: Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["data"]["query"]["query_string"]["query"], "acme*");
    }

    #[tokio::test]
    async fn failed_post_is_not_retried() {
        let transport = Arc::new(
            ScriptedTransport::new().repeat_error(apisuite_core::ApiSuiteError::NetworkError("reset".into())),
        );
        let client = BasePlatformClient::builder()
            .host("platform.local")
            .with_http_transport(transport.clone())
            .build()
            .unwrap();
        assert!(client.contracts_lookup("x", &[]).await.is_err());
        assert_eq!(transport.request_count(), 1);
    }
}
