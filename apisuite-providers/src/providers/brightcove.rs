//! Brightcove Media API (read) adapter.

use std::sync::Arc;

use apisuite_core::{
    ApiProfile, CachePolicy, ClientBuilder, ClientConfig, Method, Orchestrator, Result,
    RetryPolicy, VendorFailure,
};
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::common;

pub const API_URL: &str = "https://api.brightcove.com";
const LIBRARY: &str = "services/library";

#[derive(Debug, Clone, Copy, Default)]
pub struct BrightcoveProfile;

impl ApiProfile for BrightcoveProfile {
    fn id(&self) -> &'static str {
        "Brightcove"
    }

    fn required_config_keys(&self) -> &'static [&'static str] {
        &["readToken"]
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[Method::Get]
    }

    fn base_url(&self, _config: &ClientConfig) -> Result<String> {
        Ok(API_URL.to_string())
    }

    fn build_headers(&self, _config: &ClientConfig, _method: Method) -> Result<HeaderMap> {
        common::headers([("Content-Type", "application/json")])
    }

    /// Errors come back as 200 with `{"error": {"name": .., "message": .., "code": ..}}`.
    fn failure_indicator(&self, payload: &Value) -> Option<VendorFailure> {
        match payload.get("error") {
            None | Some(Value::Null) => None,
            Some(error) => {
                let message = error
                    .get("message")
                    .map(common::value_text)
                    .unwrap_or_else(|| common::value_text(error));
                Some(VendorFailure::new(message))
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct BrightcoveBuilder {
    core: ClientBuilder,
}

impl BrightcoveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_token(self, token: impl Into<String>) -> Self {
        self.option("readToken", token)
    }

    /// Not used by any read call; kept for write commands.
    pub fn write_token(self, token: impl Into<String>) -> Self {
        self.option("writeToken", token)
    }

    pub fn build(self) -> Result<BrightcoveClient> {
        let orchestrator = self.core.build_orchestrator(
            Arc::new(BrightcoveProfile),
            CachePolicy::disabled(),
            RetryPolicy::default(),
        )?;
        Ok(BrightcoveClient { orchestrator })
    }
}

impl_builder_common!(BrightcoveBuilder);

pub struct BrightcoveClient {
    orchestrator: Orchestrator,
}

impl_api_client!(BrightcoveClient);

impl BrightcoveClient {
    pub fn builder() -> BrightcoveBuilder {
        BrightcoveBuilder::new()
    }

    pub async fn find_video_by_id(&self, video_id: impl ToString) -> Result<Value> {
        self.library(vec![
            ("command", "find_video_by_id".to_string()),
            ("video_id", video_id.to_string()),
        ])
        .await
    }

    /// One page of the video library, limited to `fields` when given.
    pub async fn find_all_videos(&self, page_number: u32, fields: &[&str]) -> Result<Value> {
        self.library(vec![
            ("command", "find_all_videos".to_string()),
            ("video_fields", fields.join(",")),
            ("page_number", page_number.to_string()),
        ])
        .await
    }

    async fn library(&self, params: Vec<(&str, String)>) -> Result<Value> {
        let token = self.orchestrator.config().get_or("readToken", "").to_string();
        let request = self
            .orchestrator
            .request(Method::Get, LIBRARY)?
            .query_params(params)
            .query_param("token", token)
            .build()?;
        self.orchestrator.execute_default(&request).await
    }
}
