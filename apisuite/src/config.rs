//! Suite configuration document.
//!
//! ```json
//! {
//!   "clients": {
//!     "base2":     { "host": "cms.example.com", "user": "svc", "key": "..." },
//!     "mailchimp": { "host": "us4.api.mailchimp.com", "apikey": "...", "batch_size": 250 }
//!   },
//!   "cache": { "enabled": true, "ttl": 300 },
//!   "http": { "timeout": 30, "connect_timeout": 10, "headers": {}, "proxy": null, "user_agent": null }
//! }
//! ```
//!
//! Option values may be strings, numbers or booleans; they are stored as text.

use std::collections::BTreeMap;

use apisuite_core::observability::TracingConfig;
use apisuite_core::types::HttpConfig;
use apisuite_core::{ApiSuiteError, ClientConfig, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shared response cache settings for cacheable adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Overrides each adapter's default TTL; `0` never expires.
    pub ttl: Option<u64>,
    /// Entries kept by the in-memory backend.
    pub capacity: Option<usize>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: None,
            capacity: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Adapter name to its options.
    pub clients: BTreeMap<String, BTreeMap<String, Value>>,
    pub cache: CacheSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracing: Option<TracingConfig>,
}

impl SuiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| ApiSuiteError::ParseError(format!("invalid suite configuration: {e}")))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| ApiSuiteError::ParseError(format!("invalid suite configuration: {e}")))
    }

    /// Adds or replaces one adapter's options.
    pub fn with_client<I, K, V>(mut self, name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let options = options
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.clients.insert(name.into(), options);
        self
    }

    pub fn with_cache(mut self, cache: CacheSettings) -> Self {
        self.cache = cache;
        self
    }

    pub fn client_names(&self) -> impl Iterator<Item = &str> {
        self.clients.keys().map(String::as_str)
    }

    /// Options of `name` as a [`ClientConfig`]; null values are dropped.
    pub fn client_config(&self, name: &str) -> Option<ClientConfig> {
        let options = self.clients.get(name)?;
        Some(
            options
                .iter()
                .filter_map(|(key, value)| {
                    let text = match value {
                        Value::Null => return None,
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    Some((key.clone(), text))
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_mixed_option_values() {
        let config = SuiteConfig::from_value(json!({
            "clients": {
                "mailchimp": {"host": "us4.api.mailchimp.com", "apikey": "k", "batch_size": 250, "unused": null}
            },
            "cache": {"enabled": false}
        }))
        .unwrap();

        let mailchimp = config.client_config("mailchimp").unwrap();
        assert_eq!(mailchimp.get("batch_size"), Some("250"));
        assert_eq!(mailchimp.get("unused"), None);
        assert!(!config.cache.enabled);
        assert!(config.client_config("base2").is_none());
    }

    #[test]
    fn cache_is_enabled_by_default() {
        let config = SuiteConfig::from_json_str(r#"{"clients": {}}"#).unwrap();
        assert_eq!(config.cache, CacheSettings::default());
        assert!(config.cache.enabled);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = SuiteConfig::from_json_str(r#"{"clients": []}"#).unwrap_err();
        assert!(matches!(err, ApiSuiteError::ParseError(_)));
    }
}
