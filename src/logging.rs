// src/logging.rs

//! Logging setup for `matrix-runner` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--debug` / `--verbose` / `--silent` CLI flags (if given)
//! 2. `MATRIX_RUNNER_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `warn`
//!
//! Logs are sent to STDERR so that stdout carries only the run summary.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable consulted when no logging flag is given.
pub const LOG_ENV: &str = "MATRIX_RUNNER_LOG";

/// Initialise global logging subscriber.
///
/// A subscriber that is already installed (by an embedding program, a test
/// harness or an earlier call) is left in place.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    let installed = fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init();

    match installed {
        Ok(()) => Ok(()),
        Err(_) if tracing::dispatcher::has_been_set() => Ok(()),
        Err(e) => Err(anyhow::anyhow!("initialising logging: {e}")),
    }
}

/// Combine the CLI level with the environment value.
///
/// The environment accepts any `tracing` level name (`error` .. `trace`,
/// case-insensitive) or its number `1..=5`; anything else falls back to WARN.
pub fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    match cli_level {
        Some(LogLevel::Error) => Level::ERROR,
        Some(LogLevel::Info) => Level::INFO,
        Some(LogLevel::Debug) => Level::DEBUG,
        None => env_value
            .and_then(|value| value.trim().parse::<Level>().ok())
            .unwrap_or(Level::WARN),
    }
}
