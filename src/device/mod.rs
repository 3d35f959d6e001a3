//! Device operations gated on session validity.

pub mod factory;
pub mod gateway;
pub mod models;

pub use factory::GatewayFactory;
pub use gateway::DeviceGateway;
pub use models::{ChargerStatus, Connector, ConnectorStatus, DeviceMetadata, PhysicalId, Power};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Device capability exposed to the hosting application, one per user.
#[async_trait]
pub trait DeviceListProvider: Send + Sync {
    async fn list_devices(&self, cancel: &CancellationToken) -> Result<Vec<DeviceMetadata>>;

    async fn charger_status(
        &self,
        cancel: &CancellationToken,
        id: &PhysicalId,
    ) -> Result<ChargerStatus>;

    /// Cheap local check; `true` means every gated operation will be refused.
    fn is_unauthorized(&self) -> bool;

    async fn start_charge(
        &self,
        cancel: &CancellationToken,
        id: &PhysicalId,
        power: Power,
    ) -> Result<()>;

    async fn stop_charge(&self, cancel: &CancellationToken, id: &PhysicalId) -> Result<()>;
}
