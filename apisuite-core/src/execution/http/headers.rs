//! HTTP Headers Utility
//!
//! Common utilities for building vendor headers.

use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue};

use crate::error::ApiSuiteError;

/// HTTP header builder for adapter requests
#[derive(Debug, Default)]
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a custom header, replacing any previous value.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ApiSuiteError> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ApiSuiteError::InvalidParameter(format!("Invalid header name '{name}': {e}"))
        })?;
        self.headers.insert(
            header_name,
            HeaderValue::from_str(value).map_err(|e| {
                ApiSuiteError::InvalidParameter(format!("Invalid value for header '{name}': {e}"))
            })?,
        );
        Ok(self)
    }

    pub fn with_content_type(mut self, content_type: &str) -> Result<Self, ApiSuiteError> {
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
        Ok(self)
    }

    /// Add a cookie pair, appending to any cookies already set.
    pub fn with_cookie(mut self, name: &str, value: &str) -> Result<Self, ApiSuiteError> {
        append_cookie(&mut self.headers, name, value)?;
        Ok(self)
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

/// Appends `name=value` to the `Cookie` header.
pub fn append_cookie(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
) -> Result<(), ApiSuiteError> {
    let pair = format!("{name}={value}");
    let combined = match headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
        Some(existing) if !existing.is_empty() => format!("{existing}; {pair}"),
        _ => pair,
    };
    headers.insert(COOKIE, HeaderValue::from_str(&combined)?);
    Ok(())
}

/// Merge `extra` into `base`; values in `extra` win.
pub fn merge_headers(mut base: HeaderMap, extra: &HeaderMap) -> HeaderMap {
    for name in extra.keys() {
        base.remove(name);
    }
    for (name, value) in extra {
        base.append(name.clone(), value.clone());
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookies_accumulate() {
        let headers = HttpHeaderBuilder::new()
            .with_cookie("da", "abc")
            .unwrap()
            .with_cookie("REFRESH", "true")
            .unwrap()
            .build();
        assert_eq!(headers[COOKIE], "da=abc; REFRESH=true");
    }

    #[test]
    fn merge_prefers_extra_values() {
        let base = HttpHeaderBuilder::new()
            .with_header("x-base-user", "svc")
            .unwrap()
            .with_content_type("application/json")
            .unwrap()
            .build();
        let extra = HttpHeaderBuilder::new()
            .with_header("Content-Type", "text/xml")
            .unwrap()
            .build();
        let merged = merge_headers(base, &extra);
        assert_eq!(merged[CONTENT_TYPE], "text/xml");
        assert_eq!(merged["x-base-user"], "svc");
    }

    #[test]
    fn invalid_header_value_is_rejected() {
        let err = HttpHeaderBuilder::new().with_header("x-key", "bad\nvalue").unwrap_err();
        assert!(matches!(err, ApiSuiteError::InvalidParameter(_)));
    }
}
