//! Type Conversions for ApiSuiteError
//!
//! From implementations for the error types the transport and cache layers produce.

use super::types::ApiSuiteError;

impl From<reqwest::Error> for ApiSuiteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::NetworkError(format!("request timed out: {err}"));
        }
        Self::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiSuiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ApiSuiteError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidParameter(format!("invalid header value: {err}"))
    }
}

impl From<reqwest::header::InvalidHeaderName> for ApiSuiteError {
    fn from(err: reqwest::header::InvalidHeaderName) -> Self {
        Self::InvalidParameter(format!("invalid header name: {err}"))
    }
}

impl From<url::ParseError> for ApiSuiteError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidParameter(format!("invalid url: {err}"))
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for ApiSuiteError {
    fn from(err: redis::RedisError) -> Self {
        Self::CacheError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ApiSuiteError = json_err.into();
        assert!(matches!(err, ApiSuiteError::SerializationError(_)));
    }

    #[test]
    fn test_from_url_parse_error() {
        let parse_err = reqwest::Url::parse("not a url").unwrap_err();
        let err: ApiSuiteError = parse_err.into();
        assert!(matches!(err, ApiSuiteError::InvalidParameter(_)));
    }
}
