//! OAuth 1.0a (PLAINTEXT) handshake for OpenX sessions.
//!
//! 1. request token from `requestTokenUrl`
//! 2. form login at `loginUrl`; the response names a redirect whose query
//!    carries `oauth_verifier`
//! 3. access token from `accessTokenUrl`
//!
//! The access token is then sent as the `openx3_access_token` cookie.

use std::collections::HashMap;

use apisuite_core::execution::http::headers::append_cookie;
use apisuite_core::{
    ApiSuiteError, Authenticator, ClientConfig, HttpTransport, HttpTransportRequest, Method,
    Result, Session,
};
use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, LOCATION};
use secrecy::{ExposeSecret, SecretString};

use super::SESSION_COOKIE;
use super::profile::{API_ROOT, OpenXProfile};

/// Session handshake for one OpenX instance.
pub struct OpenXAuthenticator {
    config: ClientConfig,
}

/// Temporary credentials returned by the request-token step.
struct RequestToken {
    token: String,
    secret: String,
}

impl OpenXAuthenticator {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    fn option(&self, key: &str) -> &str {
        self.config.get_or(key, "")
    }

    fn url(&self, key: &str) -> Result<Url> {
        Url::parse(self.option(key)).map_err(|e| {
            ApiSuiteError::AuthorizationError(format!("{key} is not a valid url: {e}"))
        })
    }

    /// `Authorization: OAuth ...` for a PLAINTEXT-signed request.
    fn authorization(&self, token: Option<(&str, &str)>, extra: &[(&str, &str)]) -> String {
        let token_secret = token.map(|(_, secret)| secret).unwrap_or_default();
        let signature = format!(
            "{}&{}",
            percent(self.option("consumerSecret")),
            percent(token_secret)
        );
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();

        let mut params: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", self.option("consumerKey")),
            ("oauth_signature_method", "PLAINTEXT"),
            ("oauth_signature", signature.as_str()),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_nonce", nonce.as_str()),
            ("oauth_version", "1.0"),
        ];
        if let Some((token, _)) = token {
            params.push(("oauth_token", token));
        }
        params.extend_from_slice(extra);

        let fields: Vec<String> = std::iter::once(format!("realm=\"{}\"", percent(self.option("realm"))))
            .chain(params.iter().map(|(k, v)| format!("{k}=\"{}\"", percent(v))))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }

    async fn token_request(
        &self,
        transport: &dyn HttpTransport,
        url_key: &str,
        authorization: String,
    ) -> Result<HashMap<String, String>> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&authorization)?);
        let response = transport
            .send(HttpTransportRequest {
                method: Method::Post,
                url: self.url(url_key)?,
                headers,
                body: None,
            })
            .await?;
        if response.status != 200 {
            return Err(ApiSuiteError::AuthorizationError(format!(
                "{url_key} answered with status {}",
                response.status
            )));
        }
        Ok(form_pairs(&response.text()))
    }

    async fn request_token(&self, transport: &dyn HttpTransport) -> Result<RequestToken> {
        let authorization = self.authorization(None, &[("oauth_callback", "oob")]);
        let mut pairs = self
            .token_request(transport, "requestTokenUrl", authorization)
            .await?;
        match (pairs.remove("oauth_token"), pairs.remove("oauth_token_secret")) {
            (Some(token), Some(secret)) => Ok(RequestToken { token, secret }),
            _ => Err(ApiSuiteError::AuthorizationError(
                "request token response is missing oauth_token".to_string(),
            )),
        }
    }

    /// Posts the credentials and returns the verifier from the redirect.
    async fn user_login(&self, transport: &dyn HttpTransport, token: &RequestToken) -> Result<String> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("email", self.option("email"))
            .append_pair("password", self.option("password"))
            .append_pair("oauth_token", &token.token)
            .finish();
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let response = transport
            .send(HttpTransportRequest {
                method: Method::Post,
                url: self.url("loginUrl")?,
                headers,
                body: Some(body.into_bytes()),
            })
            .await?;
        if response.status >= 400 {
            return Err(ApiSuiteError::AuthorizationError(format!(
                "login answered with status {}",
                response.status
            )));
        }

        let redirect = match response.headers.get(LOCATION).and_then(|v| v.to_str().ok()) {
            Some(location) => location.to_string(),
            None => response.text(),
        };
        let query = redirect
            .trim()
            .split_once('?')
            .map(|(_, query)| query.to_string())
            .unwrap_or_default();
        form_pairs(&query)
            .remove("oauth_verifier")
            .ok_or_else(|| {
                ApiSuiteError::AuthorizationError(
                    "login did not return an oauth_verifier".to_string(),
                )
            })
    }
}

#[async_trait]
impl Authenticator for OpenXAuthenticator {
    fn probe_request(&self) -> Result<HttpTransportRequest> {
        let url = format!("{}{API_ROOT}/session/validate", OpenXProfile::instance(&self.config));
        Ok(HttpTransportRequest {
            method: Method::Put,
            url: Url::parse(&url)?,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    async fn login(&self, transport: &dyn HttpTransport) -> Result<SecretString> {
        let request_token = self.request_token(transport).await?;
        tracing::debug!("openx request token acquired");
        let verifier = self.user_login(transport, &request_token).await?;

        let authorization = self.authorization(
            Some((request_token.token.as_str(), request_token.secret.as_str())),
            &[("oauth_verifier", verifier.as_str())],
        );
        let access = self
            .token_request(transport, "accessTokenUrl", authorization)
            .await?
            .remove("oauth_token")
            .ok_or_else(|| {
                ApiSuiteError::AuthorizationError(
                    "access token response is missing oauth_token".to_string(),
                )
            })?;
        tracing::debug!("openx access token acquired");
        Ok(SecretString::from(access))
    }

    fn apply(&self, session: &Session, headers: &mut HeaderMap) -> Result<()> {
        if let Some(token) = session.material() {
            append_cookie(headers, SESSION_COOKIE, token.expose_secret())?;
        }
        Ok(())
    }
}

fn percent(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn form_pairs(raw: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(raw.trim().as_bytes())
        .into_owned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> OpenXAuthenticator {
        OpenXAuthenticator::new(
            ClientConfig::new()
                .with("consumerKey", "ck")
                .with("consumerSecret", "c&s")
                .with("realm", "ox")
                .with("oxInstance", "https://ox.local/"),
        )
    }

    #[test]
    fn plaintext_signature_joins_encoded_secrets() {
        let header = authenticator().authorization(Some(("tok", "ts")), &[("oauth_verifier", "v1")]);
        assert!(header.starts_with("OAuth realm=\"ox\", oauth_consumer_key=\"ck\""));
        assert!(header.contains("oauth_signature_method=\"PLAINTEXT\""));
        assert!(header.contains("oauth_signature=\"c%2526s%26ts\""));
        assert!(header.contains("oauth_token=\"tok\""));
        assert!(header.ends_with("oauth_verifier=\"v1\""));
    }

    #[test]
    fn probe_validates_the_session() {
        let probe = authenticator().probe_request().unwrap();
        assert_eq!(probe.method, Method::Put);
        assert_eq!(probe.url.as_str(), "https://ox.local/ox/3.0/a/session/validate");
    }

    #[test]
    fn session_token_becomes_a_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("a=1"));
        let session = Session::authenticated(Some(SecretString::from("tkn")));
        authenticator().apply(&session, &mut headers).unwrap();
        assert_eq!(headers["cookie"], "a=1; openx3_access_token=tkn");
    }
}
