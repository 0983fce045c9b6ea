//! HTTP transport abstraction.
//!
//! The orchestrator never talks to a socket directly: it hands the final
//! method, URL, headers and body to an injected `HttpTransport` and receives
//! a status, headers and body back. Tests substitute scripted transports;
//! production code uses `ReqwestTransport`.

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::HeaderMap;

use crate::error::ApiSuiteError;
use crate::types::{Method, RequestDescriptor};

/// Transport-level request data.
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl HttpTransportRequest {
    /// Wire form of a descriptor with the given effective headers.
    pub fn from_descriptor(
        descriptor: &RequestDescriptor,
        headers: HeaderMap,
    ) -> Result<Self, ApiSuiteError> {
        Ok(Self {
            method: descriptor.method(),
            url: descriptor.target_url(),
            headers,
            body: descriptor.body().to_bytes()?,
        })
    }

    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct HttpTransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpTransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs one HTTP exchange.
///
/// Implementations report socket, TLS and timeout failures as
/// `ApiSuiteError::NetworkError`; any completed exchange, whatever its status,
/// is an `Ok` response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, ApiSuiteError>;
}
