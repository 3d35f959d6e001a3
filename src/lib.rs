//! Charge Amps device gateway.
//!
//! Fetches a fleet operator's chargers and their status from the Charge Amps
//! HTTP API on behalf of individual users, managing each user's bearer-token
//! session along the way.
//!
//! # Quick Start
//!
//! ```no_run
//! use chargeamps_gateway::prelude::*;
//!
//! # async fn example() -> chargeamps_gateway::error::Result<()> {
//! let factory = GatewayFactory::from_config(&GatewayConfig::from_env())?;
//! let gateway = factory.create("user-42", &EnvCredentials::new("CHARGEAMPS_USER_42"));
//!
//! let cancel = CancellationToken::new();
//! for device in gateway.list_devices(&cancel).await? {
//!     let status = gateway.charger_status(&cancel, &PhysicalId::new(device.id)).await?;
//!     println!("{status:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod device;
pub mod error;
pub mod prelude;
pub mod util;
