// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::time::Duration;

pub const ENV_STORE_URL: &str = "MARQUEE_STORE_URL";
pub const ENV_BIND: &str = "MARQUEE_BIND";
pub const ENV_PORT: &str = "PORT";
pub const ENV_MAX_BODY_BYTES: &str = "MARQUEE_MAX_BODY_BYTES";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "MARQUEE_REQUEST_TIMEOUT_MS";
pub const ENV_CORS_ORIGINS: &str = "MARQUEE_CORS_ORIGINS";
pub const ENV_LOG_JSON: &str = "MARQUEE_LOG_JSON";
pub const ENV_SHUTDOWN_DRAIN_MS: &str = "MARQUEE_SHUTDOWN_DRAIN_MS";

#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

#[must_use]
pub fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

#[must_use]
pub fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[must_use]
pub fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

#[must_use]
pub fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

/// Unset and blank values both fall back to `default`.
#[must_use]
pub fn env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Comma-separated list; empty items are dropped.
#[must_use]
pub fn env_list(name: &str, default: &[&str]) -> Vec<String> {
    match env::var(name) {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect(),
        Err(_) => default.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool(" yes "), Some(true));
        assert_eq!(parse_bool("FALSE"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn env_helpers_fall_back_on_missing_or_garbage() {
        let name = "MARQUEE_TEST_ENV_HELPERS_UNSET";
        env::remove_var(name);
        assert!(env_bool(name, true));
        assert_eq!(env_u64(name, 7), 7);
        assert_eq!(env_string(name, "dflt"), "dflt");
        assert_eq!(env_list(name, &["*"]), vec!["*".to_string()]);

        let garbage = "MARQUEE_TEST_ENV_HELPERS_GARBAGE";
        env::set_var(garbage, "not-a-number");
        assert_eq!(env_usize(garbage, 3), 3);
        assert_eq!(env_duration_ms(garbage, 250), Duration::from_millis(250));
        env::remove_var(garbage);
    }

    #[test]
    fn env_list_splits_and_trims() {
        let name = "MARQUEE_TEST_ENV_LIST";
        env::set_var(name, " http://a.test , ,http://b.test");
        assert_eq!(
            env_list(name, &[]),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        env::remove_var(name);
    }
}
