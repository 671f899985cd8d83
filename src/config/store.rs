//! Layered key/value store implementing the precedence order.
//!
//! Highest first: explicit command-line value, environment, config file,
//! registered default. Keys are case-insensitive.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use super::ConfigError;
use super::env::EnvLayer;
use super::file::{ConfigLocation, FileLayer};
use super::options::ConfigOptions;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    /// Supplied on the command line
    CommandLine,
    /// Read from a prefixed environment variable
    Environment,
    /// Read from the config file
    File,
    /// Compiled-in default
    #[default]
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CommandLine => "command line",
            Self::Environment => "environment",
            Self::File => "config file",
            Self::Default => "default",
        };
        f.write_str(name)
    }
}

/// A value together with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The effective value
    pub value: String,
    /// Layer that supplied it
    pub source: Source,
}

/// The store consulted by the resolver.
///
/// Constructed once per invocation and passed by reference; there is no
/// global instance.
#[derive(Debug, Default)]
pub struct ConfigStore {
    flags: HashMap<String, String>,
    env: EnvLayer,
    file: FileLayer,
    defaults: HashMap<String, String>,
}

impl ConfigStore {
    /// Creates a store over the given environment and file layers.
    #[must_use]
    pub fn new(env: EnvLayer, file: FileLayer) -> Self {
        Self {
            flags: HashMap::new(),
            env,
            file,
            defaults: HashMap::new(),
        }
    }

    /// Loads the config file named by `options` (or the default under `home`)
    /// and layers it under `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file location cannot be determined, or if the
    /// file is explicit but unreadable, or present but malformed.
    pub fn load(
        options: &ConfigOptions,
        home: Option<&Path>,
        env: EnvLayer,
    ) -> Result<Self, ConfigError> {
        let location = ConfigLocation::resolve(options.config_path(), home)?;
        let file = location.load()?;
        Ok(Self::new(env, file))
    }

    /// Registers the fallback value for a key.
    pub fn set_default(&mut self, key: &str, value: &str) {
        self.defaults.insert(key.to_lowercase(), value.to_string());
    }

    /// Binds an explicitly supplied command-line value for a key.
    pub fn bind_flag(&mut self, key: &str, value: &str) {
        self.flags.insert(key.to_lowercase(), value.to_string());
    }

    /// Resolves a key through the layers, highest precedence first.
    ///
    /// Returns `None` only if no layer, including defaults, knows the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Resolved> {
        let key = key.to_lowercase();

        let (value, source) = if let Some(value) = self.flags.get(&key) {
            (value.as_str(), Source::CommandLine)
        } else if let Some(value) = self.env.get(&key) {
            (value, Source::Environment)
        } else if let Some(value) = self.file.get(&key) {
            (value, Source::File)
        } else {
            (self.defaults.get(&key)?.as_str(), Source::Default)
        };

        Some(Resolved {
            value: value.to_string(),
            source,
        })
    }
}
