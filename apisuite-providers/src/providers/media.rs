//! Media server adapter: file uploads and crop regeneration.

use std::sync::Arc;

use apisuite_core::{
    ApiProfile, Body, CachePolicy, ClientBuilder, ClientConfig, Method, Orchestrator, Result,
    RetryPolicy,
};
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::common;

#[derive(Debug, Clone, Copy, Default)]
pub struct MediaProfile;

impl ApiProfile for MediaProfile {
    fn id(&self) -> &'static str {
        "Media"
    }

    fn required_config_keys(&self) -> &'static [&'static str] {
        &["host", "user", "key"]
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[Method::Get, Method::Put]
    }

    fn base_url(&self, config: &ClientConfig) -> Result<String> {
        Ok(format!("http://{}/api", common::host(config, "host")))
    }

    fn build_headers(&self, config: &ClientConfig, _method: Method) -> Result<HeaderMap> {
        common::headers([
            ("x-base-user", config.get_or("user", "")),
            ("x-base-key", config.get_or("key", "")),
        ])
    }
}

#[derive(Clone, Default)]
pub struct MediaBuilder {
    core: ClientBuilder,
}

impl MediaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(self, host: impl Into<String>) -> Self {
        self.option("host", host)
    }

    pub fn user(self, user: impl Into<String>) -> Self {
        self.option("user", user)
    }

    pub fn key(self, key: impl Into<String>) -> Self {
        self.option("key", key)
    }

    pub fn build(self) -> Result<MediaClient> {
        let orchestrator = self.core.build_orchestrator(
            Arc::new(MediaProfile),
            CachePolicy::disabled(),
            RetryPolicy::none(),
        )?;
        Ok(MediaClient { orchestrator })
    }
}

impl_builder_common!(MediaBuilder);

pub struct MediaClient {
    orchestrator: Orchestrator,
}

impl_api_client!(MediaClient);

impl MediaClient {
    pub fn builder() -> MediaBuilder {
        MediaBuilder::new()
    }

    /// Stores `data` at `file_path/file_name` on the media server.
    ///
    /// The content type is guessed from the file name.
    pub async fn upload(&self, file_path: &str, file_name: &str, data: Vec<u8>) -> Result<Value> {
        common::require_param(file_name, "file_name")?;
        let content_type = mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let request = self
            .orchestrator
            .request(Method::Put, "upload")?
            .query_param("file_name", file_name)
            .query_param("file_path", file_path)
            .body(Body::Bytes { data, content_type })
            .build()?;
        self.orchestrator.execute_default(&request).await
    }

    /// Clears resized variants after a new crop.
    pub async fn regenerate(&self, file_path: &str, file_name: &str) -> Result<Value> {
        let endpoint = format!(
            "regen/{}/{}",
            file_path.trim_matches('/'),
            file_name.trim_start_matches('/')
        );
        let request = self.orchestrator.request(Method::Get, &endpoint)?.build()?;
        self.orchestrator.execute_default(&request).await
    }
}
