//! Session identity: credential blobs, login/refresh exchanges and the
//! bearer token they produce.

pub mod credentials;
pub mod error;
pub mod identity;
pub mod session;
pub mod token;

pub use credentials::{CredentialProvider, EnvCredentials, FileCredentials, StaticCredentials};
pub use error::AuthError;
pub use identity::Identity;
pub use session::{SessionManager, SessionState};
pub use token::{RfidTag, SessionToken, UserProfile};
