use marquee_core::{
    env_bool, env_duration_ms, env_list, env_string, env_u64, env_usize, DEFAULT_PORT,
    DEFAULT_STORE_URL, ENV_BIND, ENV_CORS_ORIGINS, ENV_LOG_JSON, ENV_MAX_BODY_BYTES, ENV_PORT,
    ENV_REQUEST_TIMEOUT_MS, ENV_SHUTDOWN_DRAIN_MS, ENV_STORE_URL,
};
use serde::Serialize;
use std::time::Duration;

pub const CORS_ANY_ORIGIN: &str = "*";

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub store_url: String,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub log_json: bool,
    pub shutdown_drain: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            store_url: DEFAULT_STORE_URL.to_string(),
            max_body_bytes: 64 * 1024,
            request_timeout: Duration::from_secs(5),
            cors_allowed_origins: vec![CORS_ANY_ORIGIN.to_string()],
            log_json: true,
            shutdown_drain: Duration::ZERO,
        }
    }
}

impl ApiConfig {
    /// Reads every `MARQUEE_*` variable; unset or unparsable values keep
    /// their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = env_u64(ENV_PORT, u64::from(DEFAULT_PORT));
        Self {
            bind_addr: env_string(ENV_BIND, &format!("0.0.0.0:{port}")),
            store_url: env_string(ENV_STORE_URL, DEFAULT_STORE_URL),
            max_body_bytes: env_usize(ENV_MAX_BODY_BYTES, defaults.max_body_bytes),
            request_timeout: env_duration_ms(ENV_REQUEST_TIMEOUT_MS, 5000),
            cors_allowed_origins: env_list(ENV_CORS_ORIGINS, &[CORS_ANY_ORIGIN]),
            log_json: env_bool(ENV_LOG_JSON, defaults.log_json),
            shutdown_drain: env_duration_ms(ENV_SHUTDOWN_DRAIN_MS, 0),
        }
    }

    #[must_use]
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.cors_allowed_origins
            .iter()
            .any(|o| o == CORS_ANY_ORIGIN || o == origin)
    }

    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == CORS_ANY_ORIGIN)
    }
}

pub fn validate_startup_config(api: &ApiConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    if api.request_timeout.is_zero() {
        return Err("request timeout must be > 0".to_string());
    }
    if api.bind_addr.parse::<std::net::SocketAddr>().is_err() {
        return Err(format!("invalid bind address: {}", api.bind_addr));
    }
    if api.store_url.trim().is_empty() {
        return Err("store url must not be empty".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_startup_validation() {
        let api = ApiConfig::default();
        assert_eq!(api.bind_addr, "0.0.0.0:3000");
        assert!(api.allows_any_origin());
        validate_startup_config(&api).expect("defaults are valid");
    }

    #[test]
    fn startup_validation_rejects_zero_limits() {
        let api = ApiConfig {
            max_body_bytes: 0,
            ..ApiConfig::default()
        };
        let err = validate_startup_config(&api).expect_err("zero body limit");
        assert!(err.contains("body"));

        let api = ApiConfig {
            request_timeout: Duration::ZERO,
            ..ApiConfig::default()
        };
        let err = validate_startup_config(&api).expect_err("zero timeout");
        assert!(err.contains("timeout"));

        let api = ApiConfig {
            bind_addr: "localhost".to_string(),
            ..ApiConfig::default()
        };
        assert!(validate_startup_config(&api).is_err());
    }

    #[test]
    fn explicit_origin_list_is_exact() {
        let api = ApiConfig {
            cors_allowed_origins: vec!["http://a.test".to_string()],
            ..ApiConfig::default()
        };
        assert!(api.allows_origin("http://a.test"));
        assert!(!api.allows_origin("http://b.test"));
        assert!(!api.allows_any_origin());
    }
}
