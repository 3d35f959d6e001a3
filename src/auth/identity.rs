use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::AuthError;
use crate::api::ApiClient;

/// The narrow view of a session that device operations depend on.
///
/// Implementors are the sole authority on whether a token is usable; callers
/// never look inside the token.
#[async_trait]
pub trait Identity: Send + Sync {
    /// Access token to send as the bearer credential.
    fn access_token(&self) -> String;

    /// True when no usable access token is held. A local check only.
    fn is_unauthorized(&self) -> bool;

    /// Replace a token the remote rejected. Concurrent calls for the same
    /// `rejected` token share one exchange.
    async fn renew(
        &self,
        cancel: &CancellationToken,
        client: &ApiClient,
        rejected: &str,
    ) -> Result<(), AuthError>;
}
