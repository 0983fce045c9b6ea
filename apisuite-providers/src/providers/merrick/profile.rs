use apisuite_core::execution::http::HttpHeaderBuilder;
use apisuite_core::{ApiProfile, ClientConfig, Method, Result};
use reqwest::header::HeaderMap;

use crate::common;

#[derive(Debug, Clone, Copy, Default)]
pub struct MerrickProfile;

impl ApiProfile for MerrickProfile {
    fn id(&self) -> &'static str {
        "Merrick"
    }

    fn required_config_keys(&self) -> &'static [&'static str] {
        &["host"]
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[Method::Get, Method::Post]
    }

    fn base_url(&self, config: &ClientConfig) -> Result<String> {
        Ok(format!("http://{}/api", common::host(config, "host")))
    }

    /// The optional dev access token travels as the `da` cookie.
    fn build_headers(&self, config: &ClientConfig, _method: Method) -> Result<HeaderMap> {
        let mut builder = HttpHeaderBuilder::new();
        if let Some(token) = config.get("dev_access_token") {
            builder = builder.with_cookie("da", token)?;
        }
        Ok(builder.build())
    }
}
