use apisuite_core::{ApiProfile, ClientConfig, Method, Result};
use reqwest::header::HeaderMap;

use crate::common;

/// Path of the 3.0 API below the instance root.
pub(crate) const API_ROOT: &str = "/ox/3.0/a";

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenXProfile;

impl OpenXProfile {
    pub fn instance(config: &ClientConfig) -> String {
        config.get_or("oxInstance", "").trim().trim_end_matches('/').to_string()
    }
}

impl ApiProfile for OpenXProfile {
    fn id(&self) -> &'static str {
        "OpenX"
    }

    fn required_config_keys(&self) -> &'static [&'static str] {
        &[
            "consumerKey",
            "consumerSecret",
            "realm",
            "requestTokenUrl",
            "accessTokenUrl",
            "authorizeUrl",
            "email",
            "password",
            "loginUrl",
            "oxInstance",
        ]
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[
            Method::Get,
            Method::Post,
            Method::Put,
            Method::Delete,
            Method::Options,
        ]
    }

    fn base_url(&self, config: &ClientConfig) -> Result<String> {
        Ok(format!("{}{API_ROOT}", Self::instance(config)))
    }

    fn build_headers(&self, _config: &ClientConfig, _method: Method) -> Result<HeaderMap> {
        common::headers([("Content-Type", "application/json")])
    }
}
