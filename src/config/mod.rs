//! Configuration layer for falcoctl.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`Invocation`])
//! - The option registry of the executing command ([`FlagRegistry`])
//! - Bootstrap validation of the global options ([`ConfigOptions`])
//! - Config file discovery and decoding ([`ConfigLocation`], [`FileLayer`])
//! - Environment variable lookup ([`EnvLayer`])
//! - Precedence resolution ([`resolve`], [`ConfigStore`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Every option not in the [`ExclusionSet`] is resolved with the following
//! priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **Environment** - `FALCOCTL_<NAME>`, dashes replaced by underscores
//! 3. **Config file** - `$HOME/.falcoctl/config.yaml` or the `--config` path
//! 4. **Built-in defaults** - The parser's default value
//!
//! Excluded options (`config`, `loglevel`, `help`) only ever hold their
//! command-line value or their default.
//!
//! # Ordering
//!
//! Bootstrap validates [`ConfigOptions`] first, on command-line and default
//! values only. The file and environment layers are read afterwards.

mod cli;
pub mod defaults;
mod env;
mod error;
mod file;
mod options;
mod registry;
mod resolve;
mod store;

#[cfg(test)]
mod file_tests;
#[cfg(test)]
mod log_capture;

pub use cli::{Cli, Command, DeleteArgs, FromRegistry, InstallArgs, Invocation, SearchArgs};
pub use env::EnvLayer;
pub use error::{ConfigError, Rule, ValidationError};
pub use file::{ConfigLocation, FileFormat, FileLayer};
pub use options::{ConfigOptions, LogLevel};
pub use registry::{Flag, FlagRegistry};
pub use resolve::{ExclusionSet, Resolution, reconcile, resolve};
pub use store::{ConfigStore, Resolved, Source};
