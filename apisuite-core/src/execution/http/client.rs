//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::transport::{HttpTransport, HttpTransportRequest, HttpTransportResponse};
use crate::error::ApiSuiteError;
use crate::types::HttpConfig;

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, ApiSuiteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| {
                ApiSuiteError::InvalidParameter(format!("invalid proxy '{proxy}': {e}"))
            })?;
            builder = builder.proxy(proxy);
        }
        if !config.headers.is_empty() {
            let mut defaults = HeaderMap::new();
            for (name, value) in &config.headers {
                defaults.insert(
                    HeaderName::from_bytes(name.as_bytes())?,
                    HeaderValue::from_str(value)?,
                );
            }
            builder = builder.default_headers(defaults);
        }
        let client = builder
            .build()
            .map_err(|e| ApiSuiteError::NetworkError(format!("failed to build client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, ApiSuiteError> {
        let mut builder = self
            .client
            .request(request.method.to_reqwest()?, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpTransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Method;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_purge_verb_with_headers() {
        let server = MockServer::start().await;
        Mock::given(method("PURGE"))
            .and(path("/news/article-1"))
            .and(header("cache-control", "no-cache"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Purged"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(&HttpConfig::default()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("cache-control", HeaderValue::from_static("no-cache"));
        let response = transport
            .send(HttpTransportRequest {
                method: Method::Purge,
                url: format!("{}/news/article-1", server.uri()).parse().unwrap(),
                headers,
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text(), "Purged");
    }

    #[tokio::test]
    async fn non_success_status_is_not_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string("a=1"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(&HttpConfig::default()).unwrap();
        let response = transport
            .send(HttpTransportRequest {
                method: Method::Post,
                url: server.uri().parse().unwrap(),
                headers: HeaderMap::new(),
                body: Some(b"a=1".to_vec()),
            })
            .await
            .unwrap();
        assert_eq!(response.status, 503);
    }

    #[tokio::test]
    async fn connection_failure_is_network_error() {
        let transport = ReqwestTransport::new(&HttpConfig::default()).unwrap();
        let err = transport
            .send(HttpTransportRequest {
                method: Method::Get,
                url: "http://127.0.0.1:9/unreachable".parse().unwrap(),
                headers: HeaderMap::new(),
                body: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
