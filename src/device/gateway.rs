use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::models::{ChargerStatus, DeviceMetadata, PhysicalId, Power};
use super::DeviceListProvider;
use crate::api::{ApiClient, RefreshOnUnauthorized};
use crate::auth::Identity;
use crate::error::{GatewayError, Result};

const OP_LIST_DEVICES: &str = "listDevices";
const OP_CHARGER_STATUS: &str = "chargerStatus";
const OP_START_CHARGE: &str = "startCharge";
const OP_STOP_CHARGE: &str = "stopCharge";

const DEVICE_LIST_ENDPOINT: &str = "chargepoints/owned";

/// Device operations for one user session.
///
/// Every operation first asks the identity whether it holds a usable token
/// and refuses locally if not. Otherwise the call goes out through the
/// shared [`ApiClient`] and errors come back tagged with the operation name.
pub struct DeviceGateway {
    user_id: String,
    identity: Arc<dyn Identity>,
    client: Arc<ApiClient>,
    refresh_on_unauthorized: bool,
}

impl std::fmt::Debug for DeviceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceGateway")
            .field("user_id", &self.user_id)
            .field("unauthorized", &self.identity.is_unauthorized())
            .field("refresh_on_unauthorized", &self.refresh_on_unauthorized)
            .finish()
    }
}

impl DeviceGateway {
    pub fn new(
        user_id: impl Into<String>,
        identity: Arc<dyn Identity>,
        client: Arc<ApiClient>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            identity,
            client,
            refresh_on_unauthorized: false,
        }
    }

    /// Retry once after renewing the session when the remote answers 401.
    pub fn with_refresh_on_unauthorized(mut self, enabled: bool) -> Self {
        self.refresh_on_unauthorized = enabled;
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn identity(&self) -> &Arc<dyn Identity> {
        &self.identity
    }

    pub async fn list_devices(&self, cancel: &CancellationToken) -> Result<Vec<DeviceMetadata>> {
        self.ensure_authorized(OP_LIST_DEVICES)?;
        self.fetch(cancel, OP_LIST_DEVICES, DEVICE_LIST_ENDPOINT).await
    }

    pub async fn charger_status(
        &self,
        cancel: &CancellationToken,
        id: &PhysicalId,
    ) -> Result<ChargerStatus> {
        self.ensure_authorized(OP_CHARGER_STATUS)?;
        if !id.is_path_safe() {
            tracing::warn!(user_id = %self.user_id, op = OP_CHARGER_STATUS, id = %id, "Rejected device id");
            return Err(GatewayError::InvalidDeviceId {
                id: id.as_str().to_string(),
            });
        }
        let endpoint = format!("chargepoints/{id}/status");
        self.fetch(cancel, OP_CHARGER_STATUS, &endpoint).await
    }

    pub fn is_unauthorized(&self) -> bool {
        self.identity.is_unauthorized()
    }

    /// Not supported: starting a charge needs an RFID tag chosen from the
    /// user profile.
    pub async fn start_charge(
        &self,
        _cancel: &CancellationToken,
        id: &PhysicalId,
        power: Power,
    ) -> Result<()> {
        tracing::warn!(user_id = %self.user_id, op = OP_START_CHARGE, id = %id, power = power.0, "Operation not implemented");
        Err(GatewayError::NotImplemented {
            op: OP_START_CHARGE,
        })
    }

    /// Not supported, see [`start_charge`](Self::start_charge).
    pub async fn stop_charge(&self, _cancel: &CancellationToken, id: &PhysicalId) -> Result<()> {
        tracing::warn!(user_id = %self.user_id, op = OP_STOP_CHARGE, id = %id, "Operation not implemented");
        Err(GatewayError::NotImplemented { op: OP_STOP_CHARGE })
    }

    fn ensure_authorized(&self, op: &'static str) -> Result<()> {
        if self.identity.is_unauthorized() {
            tracing::warn!(user_id = %self.user_id, op, "Refusing request without a usable session");
            return Err(GatewayError::UnauthorizedAccess { op });
        }
        Ok(())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        op: &'static str,
        endpoint: &str,
    ) -> Result<T> {
        let result = if self.refresh_on_unauthorized {
            RefreshOnUnauthorized::new(&self.client, &*self.identity)
                .get(cancel, endpoint)
                .await
        } else {
            self.client
                .get(cancel, endpoint, &self.identity.access_token())
                .await
        };

        result.map_err(|e| {
            tracing::error!(user_id = %self.user_id, op, error = %e, "Device request failed");
            GatewayError::api(op, e)
        })
    }
}

#[async_trait]
impl DeviceListProvider for DeviceGateway {
    async fn list_devices(&self, cancel: &CancellationToken) -> Result<Vec<DeviceMetadata>> {
        DeviceGateway::list_devices(self, cancel).await
    }

    async fn charger_status(
        &self,
        cancel: &CancellationToken,
        id: &PhysicalId,
    ) -> Result<ChargerStatus> {
        DeviceGateway::charger_status(self, cancel, id).await
    }

    fn is_unauthorized(&self) -> bool {
        DeviceGateway::is_unauthorized(self)
    }

    async fn start_charge(
        &self,
        cancel: &CancellationToken,
        id: &PhysicalId,
        power: Power,
    ) -> Result<()> {
        DeviceGateway::start_charge(self, cancel, id, power).await
    }

    async fn stop_charge(&self, cancel: &CancellationToken, id: &PhysicalId) -> Result<()> {
        DeviceGateway::stop_charge(self, cancel, id).await
    }
}
