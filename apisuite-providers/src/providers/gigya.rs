//! Gigya REST adapter.
//!
//! Calls are form POSTs to `https://{namespace}.{dataCenter}.gigya.com/{namespace}.{method}`
//! authenticated with the API key and secret in the body. Gigya answers 200
//! even for failures, so the body's `errorCode` decides the outcome.

use std::sync::Arc;

use apisuite_core::{
    ApiProfile, CachePolicy, ClientBuilder, ClientConfig, Method, Orchestrator, Result,
    RetryPolicy, VendorFailure,
};
use serde_json::Value;

use crate::common;

pub const DEFAULT_DATA_CENTER: &str = "us1";

#[derive(Debug, Clone, Copy, Default)]
pub struct GigyaProfile;

impl GigyaProfile {
    pub fn data_center(config: &ClientConfig) -> &str {
        config.get_or("dataCenter", DEFAULT_DATA_CENTER)
    }

    /// Endpoint URL for a dotted API method such as `accounts.getAccountInfo`.
    pub fn method_url(config: &ClientConfig, api_method: &str) -> String {
        let namespace = api_method.split('.').next().unwrap_or(api_method);
        format!(
            "https://{namespace}.{}.gigya.com/{api_method}",
            Self::data_center(config)
        )
    }
}

impl ApiProfile for GigyaProfile {
    fn id(&self) -> &'static str {
        "Gigya"
    }

    fn required_config_keys(&self) -> &'static [&'static str] {
        &["apiKey", "secretKey"]
    }

    fn supported_methods(&self) -> &'static [Method] {
        &[Method::Post]
    }

    fn base_url(&self, config: &ClientConfig) -> Result<String> {
        Ok(format!("https://socialize.{}.gigya.com", Self::data_center(config)))
    }

    fn failure_indicator(&self, payload: &Value) -> Option<VendorFailure> {
        let code = payload.get("errorCode")?;
        if common::is_empty_value(Some(code)) {
            return None;
        }
        let mut message = payload
            .get("errorMessage")
            .map(common::value_text)
            .unwrap_or_else(|| format!("error code {}", common::value_text(code)));
        if let Some(details) = payload.get("errorDetails").filter(|d| !d.is_null()) {
            message = format!("{message} ({})", common::value_text(details));
        }
        Some(VendorFailure::new(message))
    }
}

/// Which fields `ids.getSchema` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaFilter {
    #[default]
    Full,
    ExplicitOnly,
    ClientOnly,
}

impl SchemaFilter {
    /// Unknown names fall back to `Full`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "explicitOnly" => Self::ExplicitOnly,
            "clientOnly" => Self::ClientOnly,
            _ => Self::Full,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::ExplicitOnly => "explicitOnly",
            Self::ClientOnly => "clientOnly",
        }
    }
}

#[derive(Clone, Default)]
pub struct GigyaBuilder {
    core: ClientBuilder,
}

impl GigyaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(self, api_key: impl Into<String>) -> Self {
        self.option("apiKey", api_key)
    }

    pub fn secret_key(self, secret: impl Into<String>) -> Self {
        self.option("secretKey", secret)
    }

    pub fn data_center(self, data_center: impl Into<String>) -> Self {
        self.option("dataCenter", data_center)
    }

    pub fn build(self) -> Result<GigyaClient> {
        let orchestrator = self.core.build_orchestrator(
            Arc::new(GigyaProfile),
            CachePolicy::disabled(),
            RetryPolicy::default(),
        )?;
        Ok(GigyaClient { orchestrator })
    }
}

impl_builder_common!(GigyaBuilder);

pub struct GigyaClient {
    orchestrator: Orchestrator,
}

impl_api_client!(GigyaClient);

impl GigyaClient {
    pub fn builder() -> GigyaBuilder {
        GigyaBuilder::new()
    }

    pub async fn socialize_delete_account(&self, uid: &str) -> Result<Value> {
        self.call("socialize.deleteAccount", vec![("UID", uid.to_string())])
            .await
    }

    pub async fn socialize_notify_registration(&self, uid: &str, site_uid: &str) -> Result<Value> {
        let params = vec![("UID", uid.to_string()), ("siteUID", site_uid.to_string())];
        self.call("socialize.notifyRegistration", params).await
    }

    pub async fn socialize_notify_login(&self, site_uid: &str, new_user: bool) -> Result<Value> {
        let params = vec![
            ("siteUID", site_uid.to_string()),
            ("newUser", new_user.to_string()),
        ];
        self.call("socialize.notifyLogin", params).await
    }

    pub async fn socialize_get_user_info(&self, uid: &str) -> Result<Value> {
        self.call("socialize.getUserInfo", vec![("UID", uid.to_string())])
            .await
    }

    pub async fn accounts_get_account_info(&self, uid: &str) -> Result<Value> {
        self.call("accounts.getAccountInfo", vec![("UID", uid.to_string())])
            .await
    }

    /// Schemas are sent as JSON documents.
    pub async fn ids_set_schema(&self, profile_schema: &Value, data_schema: &Value) -> Result<Value> {
        let params = vec![
            ("profileSchema", profile_schema.to_string()),
            ("dataSchema", data_schema.to_string()),
        ];
        self.call("ids.setSchema", params).await
    }

    pub async fn ids_get_schema(&self, filter: &str) -> Result<Value> {
        let filter = SchemaFilter::from_name(filter);
        self.call("ids.getSchema", vec![("filter", filter.as_str().to_string())])
            .await
    }

    async fn call(&self, api_method: &str, params: Vec<(&str, String)>) -> Result<Value> {
        let config = self.orchestrator.config();
        let mut form = vec![
            ("apiKey", config.get_or("apiKey", "").to_string()),
            ("secret", config.get_or("secretKey", "").to_string()),
            ("format", "json".to_string()),
        ];
        form.extend(params);
        let request = self
            .orchestrator
            .request_url(Method::Post, GigyaProfile::method_url(config, api_method))
            .form(form)
            .build()?;
        self.orchestrator.execute_default(&request).await
    }
}
