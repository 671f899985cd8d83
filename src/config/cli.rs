//! CLI argument parsing using clap.
//!
//! Defines the global options and the subcommands whose options take part in
//! precedence resolution.

use std::ffi::OsString;

use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};

use super::ConfigError;
use super::defaults;
use super::registry::FlagRegistry;

/// The control tool for running Falco in Kubernetes
#[derive(Debug, Parser)]
#[command(name = "falcoctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file path (default $HOME/.falcoctl/config.yaml if it exists)
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Log level
    #[arg(long = "loglevel", short = 'l', global = true, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,
}

/// Subcommands for falcoctl
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Install an artifact from a registry
    Install(InstallArgs),
    /// Search a registry for artifacts
    Search(SearchArgs),
    /// Delete an installed artifact
    Delete(DeleteArgs),
}

/// Options for `install`.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct InstallArgs {
    /// Registry URL
    #[arg(long = "registry-url", value_name = "URL")]
    pub registry_url: Option<String>,

    /// Namespace to install into
    #[arg(long, default_value = defaults::NAMESPACE)]
    pub namespace: String,

    /// Artifact tag
    #[arg(long, default_value = defaults::TAG)]
    pub tag: String,

    /// Print the plan without installing
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// Options for `search`.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct SearchArgs {
    /// Registry URL
    #[arg(long = "registry-url", value_name = "URL")]
    pub registry_url: Option<String>,

    /// Maximum number of results
    #[arg(long, default_value_t = defaults::SEARCH_LIMIT)]
    pub limit: u32,
}

/// Options for `delete`.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct DeleteArgs {
    /// Namespace to delete from
    #[arg(long, default_value = defaults::NAMESPACE)]
    pub namespace: String,

    /// Delete without confirmation
    #[arg(long)]
    pub force: bool,
}

/// Typed command arguments rebuilt from the resolved registry.
///
/// The registry is the single source of truth after resolution, so commands
/// read their arguments through this rather than from the parsed [`Cli`].
pub trait FromRegistry: Sized {
    /// Reads the arguments from the registry's current values.
    ///
    /// # Errors
    ///
    /// Returns an error if an option is missing or fails to parse.
    fn from_registry(registry: &FlagRegistry) -> Result<Self, ConfigError>;
}

fn optional(registry: &FlagRegistry, name: &str) -> Result<Option<String>, ConfigError> {
    let value = registry.require(name)?;
    Ok((!value.is_empty()).then(|| value.to_string()))
}

impl FromRegistry for InstallArgs {
    fn from_registry(registry: &FlagRegistry) -> Result<Self, ConfigError> {
        Ok(Self {
            registry_url: optional(registry, "registry-url")?,
            namespace: registry.require("namespace")?.to_string(),
            tag: registry.require("tag")?.to_string(),
            dry_run: registry.flag("dry-run")?,
        })
    }
}

impl FromRegistry for SearchArgs {
    fn from_registry(registry: &FlagRegistry) -> Result<Self, ConfigError> {
        Ok(Self {
            registry_url: optional(registry, "registry-url")?,
            limit: registry.parse("limit")?,
        })
    }
}

impl FromRegistry for DeleteArgs {
    fn from_registry(registry: &FlagRegistry) -> Result<Self, ConfigError> {
        Ok(Self {
            namespace: registry.require("namespace")?.to_string(),
            force: registry.flag("force")?,
        })
    }
}

/// A parsed command line together with the option registry of the
/// command it selected.
#[derive(Debug)]
pub struct Invocation {
    /// Typed parse result
    pub cli: Cli,
    /// Options of the selected (sub)command
    pub registry: FlagRegistry,
}

impl Invocation {
    /// Parses the process arguments, exiting with usage on error.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::try_parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parses CLI arguments from an iterator.
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments, `--help` and `--version`.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let command = Cli::command();
        let matches = command.clone().try_get_matches_from(iter)?;
        Self::from_matches(&command, &matches)
    }

    fn from_matches(command: &clap::Command, matches: &ArgMatches) -> Result<Self, clap::Error> {
        Ok(Self {
            cli: Cli::from_arg_matches(matches)?,
            registry: FlagRegistry::for_invocation(command, matches),
        })
    }
}
