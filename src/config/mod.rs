//! Gateway configuration (layered: code > env > defaults).

use std::time::Duration;

/// Production endpoint of the Charge Amps external API.
pub const DEFAULT_BASE_URL: &str = "https://eapi.charge.space/api/v4/";

/// Fixed per-call timeout applied by the request gateway.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ENV_BASE_URL: &str = "CHARGEAMPS_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "CHARGEAMPS_TIMEOUT_SECS";
const ENV_REFRESH_ON_UNAUTHORIZED: &str = "CHARGEAMPS_REFRESH_ON_UNAUTHORIZED";

/// Settings shared by every user session served from one process.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use chargeamps_gateway::config::GatewayConfig;
///
/// let config = GatewayConfig::new("https://eapi.charge.space/api/v4")
///     .with_timeout(Duration::from_secs(5))
///     .with_refresh_on_unauthorized(true);
/// assert_eq!(config.base_url(), "https://eapi.charge.space/api/v4/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    base_url: String,
    timeout: Duration,
    refresh_on_unauthorized: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            timeout: DEFAULT_TIMEOUT,
            refresh_on_unauthorized: false,
        }
    }

    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = std::env::var(ENV_BASE_URL)
            .map(Self::new)
            .unwrap_or_default();

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    variable = ENV_TIMEOUT_SECS,
                    value = %raw,
                    "Ignoring invalid timeout, keeping default"
                ),
            }
        }

        if let Ok(raw) = std::env::var(ENV_REFRESH_ON_UNAUTHORIZED) {
            config.refresh_on_unauthorized = parse_flag(&raw);
        }

        config
    }

    /// Override the per-call timeout. A zero duration is ignored.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if timeout.is_zero() {
            tracing::warn!(timeout = ?self.timeout, "Ignoring zero timeout, keeping current value");
        } else {
            self.timeout = timeout;
        }
        self
    }

    pub fn with_refresh_on_unauthorized(mut self, enabled: bool) -> Self {
        self.refresh_on_unauthorized = enabled;
        self
    }

    /// Base URL, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn refresh_on_unauthorized(&self) -> bool {
        self.refresh_on_unauthorized
    }
}

fn normalize_base_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
