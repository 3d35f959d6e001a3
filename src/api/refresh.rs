//! Refresh-and-retry wrapper around [`ApiClient`].

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::client::ApiClient;
use crate::auth::Identity;
use crate::error::ApiError;

/// Authenticated GETs that survive one expired access token.
///
/// A `401 Unauthorized` answer triggers one renewal of the identity, keyed on
/// the token that was rejected so concurrent callers share a single exchange,
/// followed by exactly one retry. If renewal fails the original 401 is
/// returned.
pub struct RefreshOnUnauthorized<'a> {
    client: &'a ApiClient,
    identity: &'a dyn Identity,
}

impl<'a> RefreshOnUnauthorized<'a> {
    pub fn new(client: &'a ApiClient, identity: &'a dyn Identity) -> Self {
        Self { client, identity }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let token = self.identity.access_token();
        match self.client.get(cancel, endpoint, &token).await {
            Err(err) if err.is_unauthorized() => {
                if let Err(renew_err) = self.identity.renew(cancel, self.client, &token).await {
                    tracing::warn!(endpoint, error = %renew_err, "Session renewal after 401 failed");
                    return Err(err);
                }
                let renewed = self.identity.access_token();
                self.client.get(cancel, endpoint, &renewed).await
            }
            other => other,
        }
    }
}
