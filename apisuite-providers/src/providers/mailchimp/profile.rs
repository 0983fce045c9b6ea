use apisuite_core::profile::error_strings;
use apisuite_core::{ApiProfile, ClientConfig, Method, Result, VendorFailure};
use serde_json::Value;

use crate::common;

#[derive(Debug, Clone, Copy, Default)]
pub struct MailchimpProfile;

impl ApiProfile for MailchimpProfile {
    fn id(&self) -> &'static str {
        "Mailchimp"
    }

    fn required_config_keys(&self) -> &'static [&'static str] {
        &["apikey", "host"]
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[Method::Post]
    }

    fn base_url(&self, config: &ClientConfig) -> Result<String> {
        Ok(format!("https://{}/2.0", common::host(config, "host")))
    }

    fn failure_indicator(&self, payload: &Value) -> Option<VendorFailure> {
        let errors = payload.get("errors");
        (!common::is_empty_value(errors))
            .then(|| VendorFailure::with_errors(error_strings(errors)))
    }

    /// Error bodies look like `{"status": "error", "code": 232, "name": "..", "error": ".."}`.
    fn client_errors(&self, payload: &Value) -> Vec<String> {
        match payload.get("error") {
            Some(error) if !error.is_null() => vec![common::value_text(error)],
            _ => error_strings(payload.get("errors")),
        }
    }
}
