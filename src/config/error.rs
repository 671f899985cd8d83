//! Error types for configuration loading, validation and resolution.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Every variant is fatal for the invocation: bootstrap logs it and exits.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No explicit config path was given and the home directory is unknown.
    #[error("Failed to determine the home directory for the default config file")]
    HomeDirUnavailable,

    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The YAML document could not be parsed.
    #[error("Failed to parse YAML config '{}': {source}", path.display())]
    YamlParse {
        /// Path to the config file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_yaml::Error,
    },

    /// The TOML document could not be parsed.
    #[error("Failed to parse TOML config '{}': {source}", path.display())]
    TomlParse {
        /// Path to the config file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },

    /// The document parsed but its top level is not a key/value mapping.
    #[error("Config file '{}' must contain a key/value mapping at the top level", path.display())]
    NotAMapping {
        /// Path to the config file
        path: PathBuf,
    },

    /// The file extension does not name a supported format.
    #[error("Unsupported config file format '{}': expected .yaml, .yml or .toml", path.display())]
    UnsupportedFormat {
        /// Path to the config file
        path: PathBuf,
    },

    /// The log level could not be parsed.
    #[error("Invalid log level '{value}': expected trace, debug, info, warn or error")]
    InvalidLogLevel {
        /// The invalid value provided
        value: String,
    },

    /// An option's resolved value does not parse as the type its command expects.
    #[error("Invalid value '{value}' for option '{option}': {reason}")]
    InvalidValue {
        /// Option name
        option: String,
        /// The offending value
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A command asked for an option that was never registered.
    #[error("Unknown option '{option}'")]
    UnknownOption {
        /// Option name
        option: String,
    },

    /// One or more configuration options failed validation.
    #[error("{} configuration option(s) failed validation", .0.len())]
    Validation(Vec<ValidationError>),
}

/// A single failed validation check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value '{value}' for option '{option}': {rule}")]
pub struct ValidationError {
    /// Name of the offending option
    pub option: &'static str,
    /// The rejected value
    pub value: String,
    /// The violated rule
    pub rule: Rule,
}

/// Validation rules applied to [`ConfigOptions`](super::ConfigOptions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The value must name a file, not a directory.
    FilePath,
    /// The file extension must name a supported format.
    SupportedFormat,
    /// The value must be a known log level.
    LogLevel,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilePath => f.write_str("must be a file path"),
            Self::SupportedFormat => f.write_str("must end in .yaml, .yml or .toml"),
            Self::LogLevel => f.write_str("must be one of trace, debug, info, warn, error"),
        }
    }
}

impl ConfigError {
    /// Creates an `InvalidValue` error for an option.
    #[must_use]
    pub fn invalid_value(option: &str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidValue {
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
