use apisuite_core::profile::error_strings;
use apisuite_core::{ApiProfile, ClientConfig, Method, Result};
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::common;

#[derive(Debug, Clone, Copy, Default)]
pub struct OmedaProfile;

impl OmedaProfile {
    /// Root for calls that apply to the whole client account.
    pub fn client_url(config: &ClientConfig) -> String {
        format!(
            "https://{}/webservices/rest/client/{}",
            common::host(config, "host"),
            config.get_or("client", "")
        )
    }
}

impl ApiProfile for OmedaProfile {
    fn id(&self) -> &'static str {
        "Omeda"
    }

    fn required_config_keys(&self) -> &'static [&'static str] {
        &["host", "client", "brand", "appid", "inputid"]
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[Method::Get, Method::Post, Method::Put, Method::Delete]
    }

    fn base_url(&self, config: &ClientConfig) -> Result<String> {
        Ok(format!(
            "https://{}/webservices/rest/brand/{}",
            common::host(config, "host"),
            config.get_or("brand", "")
        ))
    }

    fn build_headers(&self, config: &ClientConfig, method: Method) -> Result<HeaderMap> {
        let appid = config.get_or("appid", "");
        if method.is_modifying() {
            common::headers([
                ("x-omeda-appid", appid),
                ("x-omeda-inputid", config.get_or("inputid", "")),
                ("Content-Type", "application/json"),
            ])
        } else {
            common::headers([("x-omeda-appid", appid)])
        }
    }

    /// Omeda reports `{"Errors": [{"Error": "..."}]}`.
    fn client_errors(&self, payload: &Value) -> Vec<String> {
        match payload.get("Errors") {
            Some(Value::Array(errors)) => errors
                .iter()
                .map(|e| match e.get("Error") {
                    Some(message) => common::value_text(message),
                    None => common::value_text(e),
                })
                .collect(),
            other => error_strings(other),
        }
    }
}
