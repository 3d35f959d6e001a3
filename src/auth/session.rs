use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::credentials::CredentialProvider;
use super::error::AuthError;
use super::identity::Identity;
use super::token::SessionToken;
use crate::api::ApiClient;

const LOGIN_ENDPOINT: &str = "auth/login";
const REFRESH_ENDPOINT: &str = "auth/refreshToken";

/// Observable session state. A session that was never set and one that was
/// cleared after a failure look the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthorized,
    Authenticated,
}

/// Holds the current [`SessionToken`] for one user session.
///
/// The token is replaced wholesale and read through immutable snapshots, so
/// a reader sees either the old or the new access/refresh pair, never a mix.
/// Login and refresh exchanges are serialized behind one gate; concurrent
/// refreshes of the same stale token collapse into a single request.
///
/// A failed login or refresh clears the session. A *cancelled* one leaves the
/// held token untouched.
///
/// # Example
/// ```no_run
/// use chargeamps_gateway::api::ApiClient;
/// use chargeamps_gateway::auth::SessionManager;
/// use chargeamps_gateway::config::GatewayConfig;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new(&GatewayConfig::from_env())?;
/// let cancel = CancellationToken::new();
/// let session = SessionManager::login(&cancel, &client, "a@b.com", "x").await?;
/// assert!(!session.is_unauthorized());
/// session.refresh(&cancel, &client).await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionManager {
    token: RwLock<Arc<SessionToken>>,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::unauthenticated()
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshPayload<'a> {
    token: &'a str,
    refresh_token: &'a str,
}

impl SessionManager {
    /// A session with no token; every gated operation is refused.
    pub fn unauthenticated() -> Self {
        Self::from_token(SessionToken::default())
    }

    pub fn from_token(token: SessionToken) -> Self {
        Self {
            token: RwLock::new(Arc::new(token)),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Decode a credential blob. Returns `None` when it does not decode;
    /// callers treat that as "no usable session".
    pub fn from_credential_blob(blob: &str) -> Option<Self> {
        match SessionToken::from_blob(blob) {
            Ok(token) => Some(Self::from_token(token)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to decode credential blob");
                None
            }
        }
    }

    /// Ask `provider` for the blob once and decode it.
    pub fn from_provider(provider: &dyn CredentialProvider) -> Option<Self> {
        match provider.provide_secret() {
            Ok(blob) => Self::from_credential_blob(&blob),
            Err(e) => {
                tracing::error!(error = %e, "Credential provider returned no secret");
                None
            }
        }
    }

    /// Exchange email and password for a new session.
    pub async fn login(
        cancel: &CancellationToken,
        client: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthError> {
        let session = Self::unauthenticated();
        session.sign_in(cancel, client, email, password).await?;
        Ok(session)
    }

    /// Log in again on this session, replacing whatever token it held.
    ///
    /// On failure the session is left unauthorized.
    pub async fn sign_in(
        &self,
        cancel: &CancellationToken,
        client: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<Arc<SessionToken>, AuthError> {
        let _gate = self.refresh_gate.lock().await;
        let payload = LoginPayload { email, password };
        let result = client
            .post_without_token::<_, SessionToken>(cancel, LOGIN_ENDPOINT, &payload)
            .await
            .map_err(AuthError::Login);
        self.settle(result, "login")
    }

    /// Exchange the current token pair for a new one.
    pub async fn refresh(
        &self,
        cancel: &CancellationToken,
        client: &ApiClient,
    ) -> Result<Arc<SessionToken>, AuthError> {
        let stale = self.access_token();
        self.refresh_if_stale(cancel, client, &stale).await
    }

    /// Refresh only if `stale` is still the held access token.
    ///
    /// A caller that waited behind another exchange which already replaced
    /// `stale` gets that result without issuing a request of its own.
    pub async fn refresh_if_stale(
        &self,
        cancel: &CancellationToken,
        client: &ApiClient,
        stale: &str,
    ) -> Result<Arc<SessionToken>, AuthError> {
        let _gate = self.refresh_gate.lock().await;

        let current = self.snapshot();
        if current.access_token != stale && !current.is_unauthorized() {
            tracing::debug!("Token already refreshed by a concurrent caller");
            return Ok(current);
        }

        if current.refresh_token.is_empty() {
            self.clear();
            return Err(AuthError::MissingRefreshToken);
        }

        let payload = RefreshPayload {
            token: &current.access_token,
            refresh_token: &current.refresh_token,
        };
        let result = client
            .post_without_token::<_, SessionToken>(cancel, REFRESH_ENDPOINT, &payload)
            .await
            .map_err(AuthError::Refresh);
        self.settle(result, "refresh")
    }

    /// Current access token, verbatim.
    pub fn access_token(&self) -> String {
        self.snapshot().access_token.clone()
    }

    /// True iff the held access token is empty.
    pub fn is_unauthorized(&self) -> bool {
        self.snapshot().is_unauthorized()
    }

    pub fn state(&self) -> SessionState {
        if self.is_unauthorized() {
            SessionState::Unauthorized
        } else {
            SessionState::Authenticated
        }
    }

    /// Immutable copy of the held token.
    pub fn snapshot(&self) -> Arc<SessionToken> {
        match self.token.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn replace(&self, token: SessionToken) -> Arc<SessionToken> {
        let token = Arc::new(token);
        match self.token.write() {
            Ok(mut guard) => *guard = Arc::clone(&token),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&token),
        }
        token
    }

    fn clear(&self) {
        self.replace(SessionToken::default());
    }

    /// Store the outcome of an exchange. A cancelled exchange leaves the held
    /// token as it was; any other failure clears it.
    fn settle(
        &self,
        result: Result<SessionToken, AuthError>,
        exchange: &'static str,
    ) -> Result<Arc<SessionToken>, AuthError> {
        match result {
            Ok(token) => Ok(self.replace(token)),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                tracing::error!(exchange, error = %e, "Session exchange failed");
                self.clear();
                Err(e)
            }
        }
    }
}

#[async_trait]
impl Identity for SessionManager {
    fn access_token(&self) -> String {
        SessionManager::access_token(self)
    }

    fn is_unauthorized(&self) -> bool {
        SessionManager::is_unauthorized(self)
    }

    async fn renew(
        &self,
        cancel: &CancellationToken,
        client: &ApiClient,
        rejected: &str,
    ) -> Result<(), AuthError> {
        self.refresh_if_stale(cancel, client, rejected).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(access: &str, refresh: &str) -> SessionToken {
        SessionToken {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            ..SessionToken::default()
        }
    }

    #[test]
    fn unauthenticated_session_is_unauthorized() {
        let session = SessionManager::unauthenticated();
        assert!(session.is_unauthorized());
        assert_eq!(session.state(), SessionState::Unauthorized);
        assert_eq!(session.access_token(), "");
    }

    #[test]
    fn non_empty_access_token_is_authenticated() {
        let session = SessionManager::from_token(token("A", "R"));
        assert!(!session.is_unauthorized());
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(session.access_token(), "A");
    }

    #[test]
    fn undecodable_blob_yields_no_session() {
        assert!(SessionManager::from_credential_blob("{broken").is_none());
        assert!(SessionManager::from_credential_blob(r#"{"token": []}"#).is_none());
    }

    #[test]
    fn snapshot_survives_replacement() {
        let session = SessionManager::from_token(token("A1", "R1"));
        let before = session.snapshot();
        session.replace(token("A2", "R2"));
        assert_eq!(before.access_token, "A1");
        assert_eq!(before.refresh_token, "R1");
        let after = session.snapshot();
        assert_eq!(after.access_token, "A2");
        assert_eq!(after.refresh_token, "R2");
    }

    #[test]
    fn refresh_payload_uses_wire_field_names() {
        let payload = RefreshPayload {
            token: "A",
            refresh_token: "R",
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({"token": "A", "refreshToken": "R"})
        );
        let login = LoginPayload {
            email: "a@b.com",
            password: "x",
        };
        assert_eq!(
            serde_json::to_value(&login).unwrap(),
            serde_json::json!({"email": "a@b.com", "password": "x"})
        );
    }

    #[test]
    fn debug_does_not_leak_token() {
        let session = SessionManager::from_token(token("secret-a", "secret-r"));
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("Authenticated"));
    }
}
