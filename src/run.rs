//! Bootstrap and command execution.
//!
//! Bootstrap runs synchronously before any command: validation gate, log
//! level, config file and environment binding, then precedence resolution
//! written back into the registry.

use std::io::Write;
use std::path::Path;

use clap::CommandFactory;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use falcoctl::config::{
    Cli, Command, ConfigError, ConfigOptions, ConfigStore, DeleteArgs, EnvLayer, ExclusionSet,
    FlagRegistry, FromRegistry, InstallArgs, LogLevel, SearchArgs, reconcile,
};

use crate::commands;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for command execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A resolved option could not be read as the command's argument type.
    #[error("Invalid command options: {0}")]
    Options(#[from] ConfigError),

    /// The command observed cancellation before completing.
    #[error("{command} was cancelled")]
    Cancelled {
        /// Name of the cancelled command
        command: &'static str,
    },

    /// Failed to write command output.
    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

/// Validates the global options and resolves the registry in place.
///
/// `apply_level` receives the validated log level before any config source is
/// read, so file and environment diagnostics honor `--loglevel`.
///
/// # Errors
///
/// Returns every validation failure at once, or the first fatal file error.
pub fn bootstrap(
    registry: &mut FlagRegistry,
    apply_level: impl FnOnce(LogLevel),
    home: Option<&Path>,
    env: EnvLayer,
) -> Result<Vec<String>, ConfigError> {
    // At this stage options are bound to command-line and default values only
    let options = ConfigOptions::from_registry(registry);
    let errors = options.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    apply_level(options.log_level.parse()?);
    tracing::debug!(
        "running with args: {}",
        std::env::args_os()
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let mut store = ConfigStore::load(&options, home, env)?;
    Ok(reconcile(registry, &mut store, &ExclusionSet::global()))
}

/// Runs the selected command against the resolved registry.
///
/// Without a command, prints help.
///
/// # Errors
///
/// Returns an error if the command's options are invalid, the command was
/// cancelled, or output fails.
pub async fn execute(
    command: Option<&Command>,
    registry: &FlagRegistry,
    shutdown: CancellationToken,
) -> Result<(), RunError> {
    let Some(command) = command else {
        return Cli::command().print_help().map_err(RunError::Output);
    };

    let (name, plan) = match command {
        Command::Install(_) => (
            "install",
            commands::install_plan(&InstallArgs::from_registry(registry)?),
        ),
        Command::Search(_) => (
            "search",
            commands::search_plan(&SearchArgs::from_registry(registry)?),
        ),
        Command::Delete(_) => (
            "delete",
            commands::delete_plan(&DeleteArgs::from_registry(registry)?),
        ),
    };

    run_plan(name, plan, &shutdown, &mut std::io::stdout()).await
}

/// Writes a command's plan one step at a time, stopping on cancellation.
async fn run_plan<W: Write>(
    command: &'static str,
    plan: Vec<String>,
    shutdown: &CancellationToken,
    out: &mut W,
) -> Result<(), RunError> {
    for step in plan {
        if shutdown.is_cancelled() {
            tracing::info!("{command} interrupted, stopping...");
            return Err(RunError::Cancelled { command });
        }
        writeln!(out, "{step}").map_err(RunError::Output)?;
        tokio::task::yield_now().await;
    }
    out.flush().map_err(RunError::Output)
}
