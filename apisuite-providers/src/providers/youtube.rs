//! YouTube Data API v3 adapter (playlist items).

use std::sync::Arc;

use apisuite_core::{
    ApiProfile, ApiSuiteError, CachePolicy, ClientBuilder, ClientConfig, Method, Orchestrator,
    Result, RetryPolicy,
};
use serde_json::Value;

pub const API_URL: &str = "https://www.googleapis.com/youtube/v3";
/// Largest page the API will return.
pub const MAX_RESULTS: u32 = 50;

#[derive(Debug, Clone, Copy, Default)]
pub struct YoutubeProfile;

impl ApiProfile for YoutubeProfile {
    fn id(&self) -> &'static str {
        "Youtube"
    }

    fn required_config_keys(&self) -> &'static [&'static str] {
        &["key"]
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[Method::Get]
    }

    fn base_url(&self, _config: &ClientConfig) -> Result<String> {
        Ok(API_URL.to_string())
    }

    /// `{"error": {"code": 400, "message": "..", "errors": [..]}}`
    fn client_errors(&self, payload: &Value) -> Vec<String> {
        payload
            .pointer("/error/message")
            .and_then(Value::as_str)
            .map(|message| vec![message.to_string()])
            .unwrap_or_default()
    }
}

#[derive(Clone, Default)]
pub struct YoutubeBuilder {
    core: ClientBuilder,
}

impl YoutubeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(self, key: impl Into<String>) -> Self {
        self.option("key", key)
    }

    pub fn build(self) -> Result<YoutubeClient> {
        let orchestrator = self.core.build_orchestrator(
            Arc::new(YoutubeProfile),
            CachePolicy::disabled(),
            RetryPolicy::default(),
        )?;
        Ok(YoutubeClient { orchestrator })
    }
}

impl_builder_common!(YoutubeBuilder);

pub struct YoutubeClient {
    orchestrator: Orchestrator,
}

impl_api_client!(YoutubeClient);

impl YoutubeClient {
    pub fn builder() -> YoutubeBuilder {
        YoutubeBuilder::new()
    }

    /// Items of the playlist named by the `playlistId` criterion.
    ///
    /// `fields` become `part` (default `snippet`), `sort` becomes `order`
    /// (default `date`).
    pub async fn retrieve_playlist_videos(
        &self,
        criteria: &[(&str, &str)],
        fields: &[&str],
        sort: &[&str],
        limit: u32,
    ) -> Result<Value> {
        if !criteria.iter().any(|(name, _)| *name == "playlistId") {
            return Err(ApiSuiteError::InvalidParameter(
                "`playlistId` is a required parameter for retrieve_playlist_videos".to_string(),
            ));
        }
        if limit > MAX_RESULTS {
            return Err(ApiSuiteError::InvalidParameter(format!(
                "Specified limit of `{limit}` is above maximum: {MAX_RESULTS}"
            )));
        }

        let part = if fields.is_empty() { "snippet".to_string() } else { fields.join(",") };
        let order = if sort.is_empty() { "date".to_string() } else { sort.join(",") };
        let key = self.orchestrator.config().get_or("key", "").to_string();
        let request = self
            .orchestrator
            .request(Method::Get, "playlistItems")?
            .query_params(criteria.iter().copied())
            .query_param("maxResults", limit)
            .query_param("part", part)
            .query_param("order", order)
            .query_param("key", key)
            .build()?;
        self.orchestrator.execute_default(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apisuite_core::testing::ScriptedTransport;
    use serde_json::json;

    fn client(transport: Arc<ScriptedTransport>) -> YoutubeClient {
        YoutubeClient::builder()
            .key("yt-key")
            .with_http_transport(transport)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn defaults_part_and_order() {
        let transport = Arc::new(ScriptedTransport::new().with_json(200, json!({"items": []})));
        client(transport.clone())
            .retrieve_playlist_videos(&[("playlistId", "PL1")], &[], &[], 10)
            .await
            .unwrap();
        assert_eq!(
            transport.last_request().unwrap().url.as_str(),
            "https://www.googleapis.com/youtube/v3/playlistItems?playlistId=PL1&maxResults=10&part=snippet&order=date&key=yt-key"
        );
    }

    #[tokio::test]
    async fn argument_errors_send_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = client(transport.clone());
        assert!(matches!(
            client.retrieve_playlist_videos(&[], &[], &[], 5).await,
            Err(ApiSuiteError::InvalidParameter(_))
        ));
        let err = client
            .retrieve_playlist_videos(&[("playlistId", "PL1")], &[], &[], 51)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter: Specified limit of `51` is above maximum: 50"
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced() {
        let transport = Arc::new(ScriptedTransport::new().with_json(
            403,
            json!({"error": {"code": 403, "message": "quotaExceeded"}}),
        ));
        let err = client(transport)
            .retrieve_playlist_videos(&[("playlistId", "PL1")], &["id"], &[], 50)
            .await
            .unwrap_err();
        assert!(err.to_string().ends_with("quotaExceeded"));
    }
}
