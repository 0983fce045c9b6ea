//! Session bootstrapping for login-gated APIs.
//!
//! Two states, `Unauthenticated` and `Authenticated`. Before a gated call the
//! bootstrapper probes the vendor; on a failed probe it runs the login
//! sequence once and probes again. A second failure is an
//! `AuthorizationError`. An authenticated session is reused until a call
//! observes a 401, which drops it back to `Unauthenticated`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use secrecy::SecretString;
use tokio::sync::Mutex;

use crate::error::{ApiSuiteError, Result};
use crate::execution::http::{HttpTransport, HttpTransportRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Immutable session snapshot; replaced wholesale on every transition.
#[derive(Clone)]
pub struct Session {
    state: SessionState,
    material: Option<SecretString>,
    acquired_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn unauthenticated() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            material: None,
            acquired_at: None,
        }
    }

    pub fn authenticated(material: Option<SecretString>) -> Self {
        Self {
            state: SessionState::Authenticated,
            material,
            acquired_at: Some(Utc::now()),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Token or cookie value obtained at login.
    pub fn material(&self) -> Option<&SecretString> {
        self.material.as_ref()
    }

    pub fn acquired_at(&self) -> Option<DateTime<Utc>> {
        self.acquired_at
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("has_material", &self.material.is_some())
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}

/// Vendor-specific half of the handshake.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Request whose 200 response proves the session is valid.
    fn probe_request(&self) -> Result<HttpTransportRequest>;

    /// Runs the login sequence and returns fresh session material.
    async fn login(&self, transport: &dyn HttpTransport) -> Result<SecretString>;

    /// Attaches session material to outgoing headers.
    fn apply(&self, session: &Session, headers: &mut HeaderMap) -> Result<()>;
}

pub struct SessionBootstrapper {
    authenticator: Arc<dyn Authenticator>,
    session: Mutex<Session>,
}

impl SessionBootstrapper {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            session: Mutex::new(Session::unauthenticated()),
        }
    }

    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    pub async fn session(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// Forget the current session; the next call bootstraps again.
    pub async fn invalidate(&self) {
        let mut session = self.session.lock().await;
        if session.is_authenticated() {
            tracing::warn!("session rejected by vendor, marking unauthenticated");
        }
        *session = Session::unauthenticated();
    }

    /// Returns an authenticated session, running probe → login → probe when needed.
    ///
    /// Concurrent callers wait on the same bootstrap instead of logging in twice.
    pub async fn ensure_authenticated(&self, transport: &dyn HttpTransport) -> Result<Session> {
        let mut session = self.session.lock().await;
        if session.is_authenticated() {
            return Ok(session.clone());
        }

        if self.probe(transport, &session).await? {
            tracing::debug!("existing session validated");
            *session = Session::authenticated(session.material.clone());
            return Ok(session.clone());
        }

        tracing::debug!("session probe rejected, running login sequence");
        let material = self
            .authenticator
            .login(transport)
            .await
            .map_err(|e| match e {
                ApiSuiteError::AuthorizationError(_) => e,
                other => ApiSuiteError::AuthorizationError(format!("login sequence failed: {other}")),
            })?;

        let candidate = Session::authenticated(Some(material));
        let validated = self.probe(transport, &candidate).await.map_err(|e| {
            ApiSuiteError::AuthorizationError(format!("post-login session probe failed: {e}"))
        })?;
        if !validated {
            return Err(ApiSuiteError::AuthorizationError(
                "Unable to authorize the API session.".to_string(),
            ));
        }

        tracing::debug!("session established");
        *session = candidate;
        Ok(session.clone())
    }

    pub fn apply(&self, session: &Session, headers: &mut HeaderMap) -> Result<()> {
        self.authenticator.apply(session, headers)
    }

    async fn probe(&self, transport: &dyn HttpTransport, session: &Session) -> Result<bool> {
        let mut request = self.authenticator.probe_request()?;
        self.authenticator.apply(session, &mut request.headers)?;
        let response = transport.send(request).await?;
        Ok(response.status == 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::http::HttpTransportResponse;
    use crate::types::Method;
    use reqwest::header::{COOKIE, HeaderValue};
    use secrecy::ExposeSecret;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Accepts the probe only when the cookie matches.
    struct CookieTransport {
        expected: &'static str,
        probes: AtomicUsize,
    }

    #[async_trait]
    impl HttpTransport for CookieTransport {
        async fn send(
            &self,
            request: HttpTransportRequest,
        ) -> std::result::Result<HttpTransportResponse, ApiSuiteError> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            let ok = request
                .headers
                .get(COOKIE)
                .is_some_and(|v| v.as_bytes() == self.expected.as_bytes());
            Ok(HttpTransportResponse::new(if ok { 200 } else { 401 }, ""))
        }
    }

    struct TokenLogin {
        token: Option<&'static str>,
        logins: AtomicUsize,
    }

    #[async_trait]
    impl Authenticator for TokenLogin {
        fn probe_request(&self) -> Result<HttpTransportRequest> {
            Ok(HttpTransportRequest {
                method: Method::Put,
                url: "http://ads.local/session/validate".parse()?,
                headers: HeaderMap::new(),
                body: None,
            })
        }

        async fn login(&self, _transport: &dyn HttpTransport) -> Result<SecretString> {
            self.logins.fetch_add(1, Ordering::SeqCst);
            self.token
                .map(|t| SecretString::from(t.to_string()))
                .ok_or_else(|| ApiSuiteError::client_error(403, "bad credentials", vec![]))
        }

        fn apply(&self, session: &Session, headers: &mut HeaderMap) -> Result<()> {
            if let Some(token) = session.material() {
                headers.insert(
                    COOKIE,
                    HeaderValue::from_str(&format!("token={}", token.expose_secret()))?,
                );
            }
            Ok(())
        }
    }

    fn bootstrapper(token: Option<&'static str>) -> (SessionBootstrapper, Arc<TokenLogin>) {
        let auth = Arc::new(TokenLogin {
            token,
            logins: AtomicUsize::new(0),
        });
        (SessionBootstrapper::new(auth.clone()), auth)
    }

    #[tokio::test]
    async fn login_then_reuse() {
        let transport = CookieTransport {
            expected: "token=abc",
            probes: AtomicUsize::new(0),
        };
        let (boot, auth) = bootstrapper(Some("abc"));
        assert_eq!(boot.state().await, SessionState::Unauthenticated);

        let session = boot.ensure_authenticated(&transport).await.unwrap();
        assert!(session.is_authenticated());
        assert!(session.acquired_at().is_some());
        assert_eq!(transport.probes.load(Ordering::SeqCst), 2);
        assert_eq!(auth.logins.load(Ordering::SeqCst), 1);

        boot.ensure_authenticated(&transport).await.unwrap();
        assert_eq!(transport.probes.load(Ordering::SeqCst), 2);
        assert_eq!(auth.logins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wrong_token_fails_after_one_login() {
        let transport = CookieTransport {
            expected: "token=abc",
            probes: AtomicUsize::new(0),
        };
        let (boot, auth) = bootstrapper(Some("stale"));
        let err = boot.ensure_authenticated(&transport).await.unwrap_err();
        assert!(matches!(err, ApiSuiteError::AuthorizationError(_)));
        assert_eq!(auth.logins.load(Ordering::SeqCst), 1);
        assert_eq!(boot.state().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn login_failure_is_authorization_error() {
        let transport = CookieTransport {
            expected: "token=abc",
            probes: AtomicUsize::new(0),
        };
        let (boot, _) = bootstrapper(None);
        let err = boot.ensure_authenticated(&transport).await.unwrap_err();
        assert!(matches!(err, ApiSuiteError::AuthorizationError(msg) if msg.contains("bad credentials")));
        assert_eq!(transport.probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_new_bootstrap() {
        let transport = CookieTransport {
            expected: "token=abc",
            probes: AtomicUsize::new(0),
        };
        let (boot, auth) = bootstrapper(Some("abc"));
        boot.ensure_authenticated(&transport).await.unwrap();
        boot.invalidate().await;
        assert_eq!(boot.state().await, SessionState::Unauthenticated);

        boot.ensure_authenticated(&transport).await.unwrap();
        // Material was dropped with the session, so the first probe fails again.
        assert_eq!(auth.logins.load(Ordering::SeqCst), 2);
        assert_eq!(transport.probes.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn debug_never_prints_material() {
        let session = Session::authenticated(Some(SecretString::from("secret-token".to_string())));
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("has_material: true"));
    }
}
