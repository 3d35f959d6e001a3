//! Tests for environment-driven configuration.

use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use chargeamps_gateway::config::{GatewayConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 3] = [
    "CHARGEAMPS_BASE_URL",
    "CHARGEAMPS_TIMEOUT_SECS",
    "CHARGEAMPS_REFRESH_ON_UNAUTHORIZED",
];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn with_clean_env<F: FnOnce()>(f: F) {
    let _lock = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
    f();
}

#[test]
fn from_env_without_variables_uses_defaults() {
    with_clean_env(|| {
        let config = GatewayConfig::from_env();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(!config.refresh_on_unauthorized());
    });
}

#[test]
fn from_env_reads_all_variables() {
    with_clean_env(|| {
        std::env::set_var("CHARGEAMPS_BASE_URL", "http://localhost:9000/api");
        std::env::set_var("CHARGEAMPS_TIMEOUT_SECS", "3");
        std::env::set_var("CHARGEAMPS_REFRESH_ON_UNAUTHORIZED", "true");

        let config = GatewayConfig::from_env();
        assert_eq!(config.base_url(), "http://localhost:9000/api/");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert!(config.refresh_on_unauthorized());
    });
}

#[test]
fn invalid_timeout_keeps_default() {
    with_clean_env(|| {
        for value in ["abc", "0", "-5"] {
            std::env::set_var("CHARGEAMPS_TIMEOUT_SECS", value);
            assert_eq!(GatewayConfig::from_env().timeout(), DEFAULT_TIMEOUT);
        }
    });
}

#[test]
fn builder_setters_override_defaults() {
    let config = GatewayConfig::new("https://example.test")
        .with_timeout(Duration::from_millis(250))
        .with_refresh_on_unauthorized(true);

    assert_eq!(config.base_url(), "https://example.test/");
    assert_eq!(config.timeout(), Duration::from_millis(250));
    assert!(config.refresh_on_unauthorized());
}
