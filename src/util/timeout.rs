//! Timeout and cancellation helper.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

/// Run a request future bounded by `duration` and the caller's `cancel` token.
///
/// An already-cancelled token fails without polling `future` at all.
pub async fn bounded<T>(
    cancel: &CancellationToken,
    duration: Duration,
    future: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    if cancel.is_cancelled() {
        return Err(ApiError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ApiError::Cancelled),
        result = tokio::time::timeout(duration, future) => match result {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout {
                timeout_ms: duration.as_millis() as u64,
            }),
        },
    }
}
