#![forbid(unsafe_code)]
//! `marquee` operations CLI: seeds the store with the fixture catalog,
//! reports catalog statistics, and prints the effective configuration.

mod commands;
mod fixtures;

use clap::{error::ErrorKind, Parser, Subcommand};
use marquee_core::{
    env_bool, env_string, ErrorContext, ExitCode, MachineError, DEFAULT_STORE_URL, ENV_LOG_JSON,
    ENV_STORE_URL,
};
use marquee_store::{StoreError, StoreErrorCode};
use std::process::ExitCode as ProcessExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MARQUEE_HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
Usage: {usage}

Options:
{options}

Commands:
{subcommands}
{after-help}";

#[derive(Parser)]
#[command(name = "marquee")]
#[command(version)]
#[command(about = "Marquee movie catalog operations CLI")]
#[command(help_template = MARQUEE_HELP_TEMPLATE)]
#[command(
    after_help = "Environment:\n  MARQUEE_STORE_URL  Store connection string\n  MARQUEE_LOG_JSON   Emit JSON logs on stderr\n  RUST_LOG           Log filter"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    /// Store connection string; overrides MARQUEE_STORE_URL.
    #[arg(long, global = true)]
    store: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clear the store and load the fixture catalog.
    Seed {
        #[arg(long, default_value_t = false)]
        recompute_ratings: bool,
    },
    /// Print catalog statistics without modifying the store.
    Stats,
    /// Print the effective configuration.
    Config,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct OutputMode {
    pub(crate) json: bool,
}

#[derive(Debug)]
pub(crate) struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    pub(crate) fn usage(message: String) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", &message),
        }
    }

    pub(crate) fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }

    pub(crate) fn validation(message: String) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            machine: MachineError::new("validation_error", &message),
        }
    }

    pub(crate) fn dependency(message: String) -> Self {
        Self {
            exit_code: ExitCode::DependencyFailure,
            machine: MachineError::new("dependency_failure", &message),
        }
    }

    /// Store faults become dependency failures; rejected documents are
    /// validation failures.
    pub(crate) fn from_store(context: &str, err: &StoreError) -> Self {
        let message = format!("{context}: {err}");
        let mut out = match err.code {
            StoreErrorCode::Unavailable | StoreErrorCode::Io | StoreErrorCode::Corrupt => {
                Self::dependency(message)
            }
            StoreErrorCode::Validation => Self::validation(message),
            StoreErrorCode::Unsupported => Self::usage(message),
            _ => Self::internal(message),
        };
        out.machine = out.machine.with_detail("store_code", err.code.as_str());
        out
    }
}

impl From<ErrorContext<StoreError>> for CliError {
    fn from(err: ErrorContext<StoreError>) -> Self {
        Self::from_store(err.context, &err.source)
    }
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    exit_code: ExitCode::Usage,
                    machine: MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                });
            }
        },
    };
    init_tracing(env_bool(ENV_LOG_JSON, false));

    let output_mode = OutputMode { json: cli.json };
    let store_url = cli
        .store
        .unwrap_or_else(|| env_string(ENV_STORE_URL, DEFAULT_STORE_URL));
    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help".to_string()))?;

    match command {
        Commands::Seed { recompute_ratings } => {
            commands::run_seed(&store_url, recompute_ratings, output_mode)
        }
        Commands::Stats => commands::run_stats(&store_url, output_mode),
        Commands::Config => commands::run_config(&store_url, output_mode),
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    // stdout carries command output; logs go to stderr.
    if log_json {
        let _ = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init();
    } else {
        let _ = registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}
