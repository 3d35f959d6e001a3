//! Convenient re-exports.

pub use crate::api::ApiClient;
pub use crate::auth::{
    AuthError, CredentialProvider, EnvCredentials, FileCredentials, Identity, SessionManager,
    SessionState, SessionToken, StaticCredentials,
};
pub use crate::config::GatewayConfig;
pub use crate::device::{
    ChargerStatus, DeviceGateway, DeviceListProvider, DeviceMetadata, GatewayFactory, PhysicalId,
    Power,
};
pub use crate::error::{ApiError, GatewayError, Result};
pub use tokio_util::sync::CancellationToken;
