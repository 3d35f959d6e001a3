use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::gateway::DeviceGateway;
use super::DeviceListProvider;
use crate::api::ApiClient;
use crate::auth::{CredentialProvider, Identity, SessionManager};
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// Builds one [`DeviceGateway`] per user, all sharing one [`ApiClient`].
///
/// # Example
/// ```no_run
/// use chargeamps_gateway::auth::StaticCredentials;
/// use chargeamps_gateway::config::GatewayConfig;
/// use chargeamps_gateway::device::GatewayFactory;
///
/// let factory = GatewayFactory::from_config(&GatewayConfig::from_env())?;
/// let gateway = factory.create("user-42", &StaticCredentials::new(r#"{"token":"T"}"#));
/// assert!(!gateway.is_unauthorized());
/// # Ok::<(), chargeamps_gateway::error::GatewayError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GatewayFactory {
    client: Arc<ApiClient>,
    refresh_on_unauthorized: bool,
}

impl GatewayFactory {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            refresh_on_unauthorized: false,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = ApiClient::new(config)
            .map_err(|e| GatewayError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::new(Arc::new(client)).with_refresh_on_unauthorized(config.refresh_on_unauthorized()))
    }

    pub fn with_refresh_on_unauthorized(mut self, enabled: bool) -> Self {
        self.refresh_on_unauthorized = enabled;
        self
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Gateway whose session is decoded from the user's credential blob.
    ///
    /// A blob that cannot be obtained or decoded yields an unauthenticated
    /// session, so every operation is refused rather than failing here.
    pub fn create(&self, user_id: &str, credentials: &dyn CredentialProvider) -> DeviceGateway {
        let session = SessionManager::from_provider(credentials).unwrap_or_else(|| {
            tracing::warn!(user_id, "No usable session from credentials");
            SessionManager::unauthenticated()
        });
        self.with_identity(user_id, Arc::new(session))
    }

    /// Gateway over a session obtained by signing in with email and password.
    pub async fn login(
        &self,
        cancel: &CancellationToken,
        user_id: &str,
        email: &str,
        password: &str,
    ) -> Result<DeviceGateway, GatewayError> {
        let session = SessionManager::login(cancel, &self.client, email, password).await?;
        Ok(self.with_identity(user_id, Arc::new(session)))
    }

    /// Gateway over an existing identity, e.g. a session obtained by login.
    pub fn with_identity(&self, user_id: &str, identity: Arc<dyn Identity>) -> DeviceGateway {
        DeviceGateway::new(user_id, identity, Arc::clone(&self.client))
            .with_refresh_on_unauthorized(self.refresh_on_unauthorized)
    }

    /// [`create`](Self::create) behind the provider trait object.
    pub fn provider(
        &self,
        user_id: &str,
        credentials: &dyn CredentialProvider,
    ) -> Arc<dyn DeviceListProvider> {
        Arc::new(self.create(user_id, credentials))
    }
}
