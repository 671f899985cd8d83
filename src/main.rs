//! falcoctl: the control tool for running Falco.
//!
//! Entry point for the falcoctl application.

use falcoctl::config::{EnvLayer, Invocation, defaults};
use falcoctl::signal::SignalContext;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

mod app;
mod commands;
mod run;

use app::{LogHandle, exit_code, report_config_error, setup_tracing};
use run::RunError;

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let log = setup_tracing();
    let invocation = Invocation::parse_args();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    runtime.block_on(run_application(invocation, &log))
}

/// Bootstraps configuration and runs the selected command under the
/// signal-aware context.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn run_application(mut invocation: Invocation, log: &LogHandle) -> ExitCode {
    let root = CancellationToken::new();
    let context = match SignalContext::with_signals(&root) {
        Ok(context) => context,
        Err(e) => {
            tracing::error!("Failed to install signal handlers: {e}");
            return exit_code::runtime_error();
        }
    };

    let home = dirs::home_dir();
    let env = EnvLayer::from_process(defaults::ENV_PREFIX);
    if let Err(e) = run::bootstrap(
        &mut invocation.registry,
        |level| log.set_level(level),
        home.as_deref(),
        env,
    ) {
        report_config_error(&e);
        context.close().await;
        return exit_code::CONFIG_ERROR;
    }

    let result = run::execute(
        invocation.cli.command.as_ref(),
        &invocation.registry,
        context.token(),
    )
    .await;
    context.close().await;

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(RunError::Options(e)) => {
            report_config_error(&e);
            exit_code::CONFIG_ERROR
        }
        Err(e) => {
            tracing::error!("error executing falcoctl: {e}");
            exit_code::runtime_error()
        }
    }
}
