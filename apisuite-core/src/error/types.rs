//! Core error types.

use std::fmt;

use thiserror::Error;

use crate::types::Method;

/// Result alias used across the workspace.
pub type Result<T, E = ApiSuiteError> = std::result::Result<T, E>;

/// Coarse error category used for logging and caller-side branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Network,
    Parsing,
    Client,
    Server,
    Authorization,
    Cache,
    Cancelled,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Validation => "validation",
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Client => "client",
            Self::Server => "server",
            Self::Authorization => "authorization",
            Self::Cache => "cache",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Every failure an adapter call can surface.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiSuiteError {
    /// One or more required configuration options are absent or empty.
    #[error(
        "The {client} API configuration is not valid. The following options must be set: {}",
        .missing.join(", ")
    )]
    InvalidConfiguration { client: String, missing: Vec<String> },

    /// The adapter was asked to send a verb it does not declare.
    #[error(
        "The request method {method} is not allowed for {client}. Only {} methods are supported.",
        join_methods(.supported)
    )]
    UnsupportedMethod {
        client: String,
        method: Method,
        supported: Vec<Method>,
    },

    /// The transport failed before a response was produced.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A 2xx body could not be decoded into a structured payload.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 4xx status, or a 2xx body carrying a vendor failure flag.
    #[error("{message}")]
    ClientError {
        status: u16,
        message: String,
        errors: Vec<String>,
    },

    /// 5xx status (and any other non-success status outside 4xx).
    #[error("{message}")]
    ServerError { status: u16, message: String },

    /// Session bootstrap could not establish an authenticated session.
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// A successful response that does not contain the requested record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A caller-supplied argument was rejected before any request was sent.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A sub-resource lookup missed the registry.
    #[error("No {client} resource exists for '{resource}'")]
    ResourceNotFound { client: String, resource: String },

    /// The response cache backend failed.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// A request or cache value could not be encoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The call was cancelled or its deadline elapsed.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// The tracing subscriber could not be installed.
    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),
}

fn join_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApiSuiteError {
    pub fn invalid_configuration(client: impl Into<String>, missing: Vec<String>) -> Self {
        Self::InvalidConfiguration {
            client: client.into(),
            missing,
        }
    }

    pub fn client_error(status: u16, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self::ClientError {
            status,
            message: message.into(),
            errors,
        }
    }

    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    pub fn resource_not_found(client: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            client: client.into(),
            resource: resource.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfiguration { .. }
            | Self::UnsupportedMethod { .. }
            | Self::TracingInit(_) => ErrorCategory::Configuration,
            Self::InvalidParameter(_)
            | Self::ResourceNotFound { .. }
            | Self::SerializationError(_) => ErrorCategory::Validation,
            Self::NetworkError(_) => ErrorCategory::Network,
            Self::ParseError(_) => ErrorCategory::Parsing,
            Self::ClientError { .. } | Self::NotFound(_) => ErrorCategory::Client,
            Self::ServerError { .. } => ErrorCategory::Server,
            Self::AuthorizationError(_) => ErrorCategory::Authorization,
            Self::CacheError(_) => ErrorCategory::Cache,
            Self::Cancelled(_) => ErrorCategory::Cancelled,
        }
    }

    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError(_))
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ClientError { status, .. } | Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthorizationError(_))
            || matches!(self.status_code(), Some(401) | Some(403))
    }

    /// Vendor error strings carried by a client error, if any.
    pub fn vendor_errors(&self) -> &[String] {
        match self {
            Self::ClientError { errors, .. } => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configuration_names_missing_keys() {
        let err = ApiSuiteError::invalid_configuration(
            "Base2",
            vec!["user".to_string(), "key".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "The Base2 API configuration is not valid. The following options must be set: user, key"
        );
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn unsupported_method_lists_supported_verbs() {
        let err = ApiSuiteError::UnsupportedMethod {
            client: "Brightcove".into(),
            method: Method::Post,
            supported: vec![Method::Get],
        };
        assert_eq!(
            err.to_string(),
            "The request method POST is not allowed for Brightcove. Only GET methods are supported."
        );
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(ApiSuiteError::NetworkError("reset".into()).is_retryable());
        assert!(!ApiSuiteError::ParseError("bad".into()).is_retryable());
        assert!(!ApiSuiteError::server_error(503, "down").is_retryable());
        assert!(!ApiSuiteError::client_error(429, "slow down", vec![]).is_retryable());
    }

    #[test]
    fn not_found_keeps_client_classification() {
        let err = ApiSuiteError::NotFound("content 42".into());
        assert_eq!(err.category(), ErrorCategory::Client);
    }

    #[test]
    fn auth_detection_covers_statuses() {
        assert!(ApiSuiteError::client_error(401, "nope", vec![]).is_auth_error());
        assert!(ApiSuiteError::AuthorizationError("probe failed".into()).is_auth_error());
        assert!(!ApiSuiteError::client_error(404, "missing", vec![]).is_auth_error());
    }
}
