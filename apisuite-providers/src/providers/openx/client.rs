use std::sync::Arc;

use apisuite_core::{CachePolicy, ClientBuilder, Method, Orchestrator, Result, RetryPolicy};
use serde_json::Value;

use super::{OpenXAuthenticator, OpenXProfile};

/// Builder for [`OpenXClient`].
#[derive(Clone, Default)]
pub struct OpenXBuilder {
    core: ClientBuilder,
}

impl OpenXBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instance root, e.g. `https://ox-ui.example.com`.
    pub fn instance(self, url: impl Into<String>) -> Self {
        self.option("oxInstance", url)
    }

    pub fn consumer(self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.option("consumerKey", key).option("consumerSecret", secret)
    }

    pub fn credentials(self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.option("email", email).option("password", password)
    }

    pub fn build(self) -> Result<OpenXClient> {
        let orchestrator = self.core.build_orchestrator(
            Arc::new(OpenXProfile),
            CachePolicy::disabled(),
            RetryPolicy::default(),
        )?;
        let authenticator = OpenXAuthenticator::new(orchestrator.config().clone());
        Ok(OpenXClient {
            orchestrator: orchestrator.with_authenticator(Arc::new(authenticator)),
        })
    }
}

impl_builder_common!(OpenXBuilder);

/// OpenX client; every call runs behind the session bootstrapper.
pub struct OpenXClient {
    orchestrator: Orchestrator,
}

impl_api_client!(OpenXClient);

impl OpenXClient {
    pub fn builder() -> OpenXBuilder {
        OpenXBuilder::new()
    }

    pub async fn ad_get(&self, ad_id: impl ToString) -> Result<Value> {
        self.get(&format!("ad/{}", ad_id.to_string())).await
    }

    pub async fn account_get(&self, account_id: impl ToString) -> Result<Value> {
        self.get(&format!("account/{}", account_id.to_string())).await
    }

    async fn get(&self, endpoint: &str) -> Result<Value> {
        let request = self.orchestrator.request(Method::Get, endpoint)?.build()?;
        self.orchestrator.execute_default(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apisuite_core::testing::ScriptedTransport;
    use apisuite_core::{ApiClient, ApiSuiteError, SessionState};
    use serde_json::json;

    fn client(transport: Arc<ScriptedTransport>) -> OpenXClient {
        OpenXClient::builder()
            .instance("https://ox.local")
            .consumer("ck", "cs")
            .credentials("ops@example.com", "pw")
            .option("realm", "ox")
            .option("requestTokenUrl", "https://sso.local/api/index/initiate")
            .option("accessTokenUrl", "https://sso.local/api/index/token")
            .option("authorizeUrl", "https://sso.local/login/process")
            .option("loginUrl", "https://sso.local/login/process")
            .with_http_transport(transport)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn handshake_runs_once_then_session_is_reused() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_response(401, "")
                .with_response(200, "oauth_token=rt&oauth_token_secret=rs&oauth_callback_confirmed=true")
                .with_response(200, "oob?oauth_token=rt&oauth_verifier=ver")
                .with_response(200, "oauth_token=at")
                .with_response(200, "{}")
                .with_json(200, json!({"id": 7}))
                .with_json(200, json!({"id": 8})),
        );
        let client = client(transport.clone());

        assert_eq!(client.ad_get(7).await.unwrap()["id"], 7);
        assert_eq!(client.account_get(8).await.unwrap()["id"], 8);

        assert_eq!(
            transport.request_lines(),
            [
                "PUT https://ox.local/ox/3.0/a/session/validate",
                "POST https://sso.local/api/index/initiate",
                "POST https://sso.local/login/process",
                "POST https://sso.local/api/index/token",
                "PUT https://ox.local/ox/3.0/a/session/validate",
                "GET https://ox.local/ox/3.0/a/ad/7",
                "GET https://ox.local/ox/3.0/a/account/8",
            ]
        );
        let requests = transport.requests();
        assert_eq!(
            requests[2].body_text(),
            Some("email=ops%40example.com&password=pw&oauth_token=rt")
        );
        assert!(
            requests[3].headers["authorization"]
                .to_str()
                .unwrap()
                .contains("oauth_verifier=\"ver\"")
        );
        assert_eq!(requests[6].headers["cookie"], "openx3_access_token=at");
        assert_eq!(
            client.orchestrator().session().unwrap().state().await,
            SessionState::Authenticated
        );
    }

    #[tokio::test]
    async fn rejected_login_is_an_authorization_error() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_response(401, "")
                .with_response(200, "oauth_token=rt&oauth_token_secret=rs")
                .with_response(200, "oob?oauth_token=rt&oauth_verifier=ver")
                .with_response(200, "oauth_token=at")
                .with_response(401, ""),
        );
        let err = client(transport.clone()).ad_get(1).await.unwrap_err();
        assert!(matches!(err, ApiSuiteError::AuthorizationError(_)));
        assert_eq!(transport.request_count(), 5);
    }

    #[tokio::test]
    async fn unauthorized_response_drops_the_session() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_response(200, "")
                .with_json(401, json!({"message": "expired"})),
        );
        let client = client(transport);
        let err = client.ad_get(3).await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(
            client.orchestrator().session().unwrap().state().await,
            SessionState::Unauthenticated
        );
    }

    #[tokio::test]
    async fn incomplete_configuration_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = OpenXClient::builder()
            .instance("https://ox.local")
            .with_http_transport(transport.clone())
            .build()
            .unwrap();
        assert!(matches!(
            client.ad_get(1).await.unwrap_err(),
            ApiSuiteError::InvalidConfiguration { .. }
        ));
        assert_eq!(transport.request_count(), 0);
    }
}
