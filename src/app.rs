//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error reporting
//! that support the main entry point.

use falcoctl::config::{ConfigError, LogLevel};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid options, unreadable config file, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - runtime or signal setup failure, command error.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Handle for changing the log level after the subscriber is installed.
pub struct LogHandle(reload::Handle<EnvFilter, Registry>);

impl LogHandle {
    /// Re-filters output at `level`.
    pub fn set_level(&self, level: LogLevel) {
        if let Err(e) = self.0.reload(env_filter(level)) {
            tracing::warn!("Failed to apply log level {level}: {e}");
        }
    }
}

/// Sets up the tracing subscriber at the default level.
///
/// The level is raised or lowered later through the returned handle, once the
/// `--loglevel` option has been validated.
pub fn setup_tracing() -> LogHandle {
    let (filter, handle) = reload::Layer::new(env_filter(LogLevel::default()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    LogHandle(handle)
}

/// Filter admitting events at `level` and above. `RUST_LOG` is not consulted,
/// so only `--loglevel` controls verbosity.
fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::default().add_directive(level.to_filter().into())
}

/// Logs a fatal bootstrap error with its full context.
pub fn report_config_error(error: &ConfigError) {
    match error {
        ConfigError::Validation(errors) => {
            for e in errors {
                tracing::error!("error validating config options: {e}");
            }
            tracing::error!("exiting for validation errors");
        }
        ConfigError::YamlParse { .. }
        | ConfigError::TomlParse { .. }
        | ConfigError::NotAMapping { .. }
        | ConfigError::FileRead { .. }
        | ConfigError::UnsupportedFormat { .. } => {
            tracing::error!("error running with config file: {error}");
        }
        _ => tracing::error!("{error}"),
    }
}
