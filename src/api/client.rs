//! Shared HTTP client with uniform header injection, status validation and
//! JSON decoding.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::GatewayConfig;
use crate::error::ApiError;
use crate::util::bounded;

/// Request gateway bound to one base URL.
///
/// Every call is a single round trip: no retries, a fixed timeout, and only
/// HTTP 200 counts as success. Failures are returned as typed [`ApiError`]s
/// and logging them is left to the caller.
///
/// # Example
/// ```no_run
/// use chargeamps_gateway::api::ApiClient;
/// use chargeamps_gateway::config::GatewayConfig;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), chargeamps_gateway::error::ApiError> {
/// let client = ApiClient::new(&GatewayConfig::from_env())?;
/// let devices: serde_json::Value = client
///     .get(&CancellationToken::new(), "chargepoints/owned", "access-token")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self::with_http_client(config, http))
    }

    /// Use a pre-built reqwest client; the configured timeout still bounds each call.
    pub fn with_http_client(config: &GatewayConfig, http: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            timeout: config.timeout(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `base_url + endpoint` and decode the body as `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        token: &str,
    ) -> Result<T, ApiError> {
        let body = self.round_trip(cancel, Method::GET, endpoint, token, None).await?;
        decode(&body)
    }

    /// GET where any 200 response counts as success, whatever the body.
    pub async fn get_void(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        token: &str,
    ) -> Result<(), ApiError> {
        self.round_trip(cancel, Method::GET, endpoint, token, None)
            .await
            .map(|_| ())
    }

    /// POST `payload` as JSON and decode the body as `T`.
    pub async fn post<P, T>(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        token: &str,
        payload: &P,
    ) -> Result<T, ApiError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(payload).map_err(ApiError::Encode)?;
        let body = self
            .round_trip(cancel, Method::POST, endpoint, token, Some(payload))
            .await?;
        decode(&body)
    }

    /// POST where any 200 response counts as success, whatever the body.
    pub async fn post_void<P>(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        token: &str,
        payload: &P,
    ) -> Result<(), ApiError>
    where
        P: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(payload).map_err(ApiError::Encode)?;
        self.round_trip(cancel, Method::POST, endpoint, token, Some(payload))
            .await
            .map(|_| ())
    }

    /// [`post`](Self::post) without an `Authorization` header.
    pub async fn post_without_token<P, T>(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        payload: &P,
    ) -> Result<T, ApiError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post(cancel, endpoint, "", payload).await
    }

    fn url(&self, endpoint: &str) -> Result<Url, ApiError> {
        let joined = format!("{}{}", self.base_url, endpoint.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))
    }

    async fn round_trip(
        &self,
        cancel: &CancellationToken,
        method: Method,
        endpoint: &str,
        token: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.url(endpoint)?;
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .headers(request_headers(token)?);
        if let Some(body) = body {
            request = request.body(body);
        }

        tracing::debug!(method = %method, url = %url, "Sending request");

        bounded(cancel, self.timeout, async move {
            let response = request.send().await?;
            let status = response.status();
            if status != StatusCode::OK {
                return Err(ApiError::Status {
                    method,
                    url: url.to_string(),
                    status,
                });
            }
            Ok::<_, ApiError>(response.bytes().await?.to_vec())
        })
        .await
    }
}

/// Headers sent on every call; `Authorization` only when `token` is non-empty.
///
/// A non-empty token that is not a valid header value fails the call; it is
/// never downgraded to an anonymous request.
fn request_headers(token: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if !token.is_empty() {
        let mut val = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::InvalidToken)?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
    }
    Ok(headers)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(ApiError::Decode)
}
