//! Per-vendor API profile.
//!
//! An `ApiProfile` carries everything the shared orchestrator needs to know
//! about one vendor: identity, required options, allowed verbs, base URL,
//! default headers and how failures are spelled inside response bodies.

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::types::Method;

/// A vendor failure reported inside a 2xx body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorFailure {
    pub message: String,
    pub errors: Vec<String>,
}

impl VendorFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(errors: Vec<String>) -> Self {
        Self {
            message: errors.join(", "),
            errors,
        }
    }
}

pub trait ApiProfile: Send + Sync {
    /// Adapter type name; used in messages and as the cache key namespace.
    fn id(&self) -> &'static str;

    fn required_config_keys(&self) -> &'static [&'static str] {
        &[]
    }

    fn supported_methods(&self) -> &'static [Method] {
        &Method::ALL
    }

    /// Absolute URL that endpoint paths are appended to.
    fn base_url(&self, config: &ClientConfig) -> Result<String>;

    /// Vendor headers for a request using `method`.
    fn build_headers(&self, _config: &ClientConfig, _method: Method) -> Result<HeaderMap> {
        Ok(HeaderMap::new())
    }

    /// Failure flag embedded in a successful response, if any.
    fn failure_indicator(&self, _payload: &Value) -> Option<VendorFailure> {
        None
    }

    /// Error strings carried by a 4xx body.
    fn client_errors(&self, payload: &Value) -> Vec<String> {
        error_strings(payload.get("errors"))
    }
}

/// Flattens an `errors` member: strings as-is, other values as compact JSON.
pub fn error_strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(value_text).collect(),
        Some(Value::Object(map)) => map.values().map(value_text).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![value_text(other)],
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
