use apisuite_core::{ApiProfile, ClientConfig, Method, Result, VendorFailure};
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::common;

#[derive(Debug, Clone, Copy, Default)]
pub struct Base2Profile;

impl ApiProfile for Base2Profile {
    fn id(&self) -> &'static str {
        "Base2"
    }

    fn required_config_keys(&self) -> &'static [&'static str] {
        &["host", "user", "key"]
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[Method::Get, Method::Post]
    }

    fn base_url(&self, config: &ClientConfig) -> Result<String> {
        Ok(format!("http://{}/api/v2", common::host(config, "host")))
    }

    fn build_headers(&self, config: &ClientConfig, _method: Method) -> Result<HeaderMap> {
        common::headers([
            ("x-base-user", config.get_or("user", "")),
            ("x-base-key", config.get_or("key", "")),
        ])
    }

    fn failure_indicator(&self, payload: &Value) -> Option<VendorFailure> {
        common::is_empty_value(payload.get("status"))
            .then(|| VendorFailure::new("Invalid status received."))
    }
}
