#![forbid(unsafe_code)]
//! Pieces shared by the marquee binaries: process exit codes, a
//! zero-allocation error-context wrapper, and the environment parsing
//! helpers both the server and the CLI read their configuration with.

mod env;
mod errors;

pub use env::{
    env_bool, env_duration_ms, env_list, env_string, env_u64, env_usize, parse_bool,
    ENV_BIND, ENV_CORS_ORIGINS, ENV_LOG_JSON, ENV_MAX_BODY_BYTES, ENV_PORT,
    ENV_REQUEST_TIMEOUT_MS, ENV_SHUTDOWN_DRAIN_MS, ENV_STORE_URL,
};
pub use errors::{ErrorContext, ExitCode, MachineError, ResultExt};

pub const CRATE_NAME: &str = "marquee-core";

/// Store used when `MARQUEE_STORE_URL` is unset.
pub const DEFAULT_STORE_URL: &str = "sqlite://artifacts/marquee.sqlite";
pub const DEFAULT_PORT: u16 = 3000;
