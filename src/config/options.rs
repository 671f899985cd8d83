//! Bootstrap options validated before any environment or file binding.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

use super::defaults;
use super::error::{ConfigError, Rule, ValidationError};
use super::file::FileFormat;
use super::registry::FlagRegistry;

/// The options bound directly from the command line for the bootstrap gate.
///
/// Populated from the registry before resolution, so it only ever sees
/// command-line and default values. Discarded once bootstrap completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOptions {
    /// Config file path, empty for the default location
    pub config_file: String,

    /// Log level name
    pub log_level: String,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            config_file: String::new(),
            log_level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

impl ConfigOptions {
    /// Binds the options from the registry's current (pre-resolution) values.
    #[must_use]
    pub fn from_registry(registry: &FlagRegistry) -> Self {
        let base = Self::default();
        Self {
            config_file: registry
                .value(defaults::CONFIG_FLAG)
                .map_or(base.config_file, str::to_string),
            log_level: registry
                .value(defaults::LOG_LEVEL_FLAG)
                .map_or(base.log_level, str::to_string),
        }
    }

    /// Explicit config path, or `None` when the default location applies.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        (!self.config_file.is_empty()).then(|| Path::new(&self.config_file))
    }

    /// Runs every check and returns all failures in option order.
    ///
    /// An empty list means the options are valid.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Some(rule) = self.config_path().and_then(check_config_path) {
            errors.push(ValidationError {
                option: defaults::CONFIG_FLAG,
                value: self.config_file.clone(),
                rule,
            });
        }

        if self.log_level.parse::<LogLevel>().is_err() {
            errors.push(ValidationError {
                option: defaults::LOG_LEVEL_FLAG,
                value: self.log_level.clone(),
                rule: Rule::LogLevel,
            });
        }

        errors
    }
}

fn check_config_path(path: &Path) -> Option<Rule> {
    let raw = path.as_os_str().to_string_lossy();
    if raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR) || path.file_name().is_none()
    {
        return Some(Rule::FilePath);
    }
    if FileFormat::from_path(path).is_none() {
        return Some(Rule::SupportedFormat);
    }
    None
}

/// Logging verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose
    Trace,
    /// Debugging details
    Debug,
    /// Normal operation
    #[default]
    Info,
    /// Warnings only
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Converts to the subscriber's filter level.
    #[must_use]
    pub const fn to_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    /// Parses a level name, case-insensitively.
    ///
    /// `warning` is accepted for `warn`; `fatal` and `panic` map to `error`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" | "fatal" | "panic" => Ok(Self::Error),
            _ => Err(ConfigError::InvalidLogLevel {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}
