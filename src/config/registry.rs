//! Registry of the options belonging to the executing command.
//!
//! Built from the parsed command line, updated in place only through
//! [`FlagRegistry::apply`], and read by commands through typed accessors.

use std::fmt::Display;
use std::str::FromStr;

use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches};

use super::ConfigError;
use super::resolve::Resolution;
use super::store::Source;

/// A single named option with its default and current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    name: String,
    default: String,
    value: String,
    explicit: bool,
    source: Source,
}

impl Flag {
    /// Creates an option holding its default value.
    pub fn new(name: impl Into<String>, default: impl Into<String>) -> Self {
        let name = name.into();
        let default = default.into();
        Self {
            value: default.clone(),
            name,
            default,
            explicit: false,
            source: Source::Default,
        }
    }

    /// Marks the option as explicitly set on the command line.
    #[must_use]
    pub fn set_on_command_line(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.explicit = true;
        self.source = Source::CommandLine;
        self
    }

    /// Option name (the long flag).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled-in default.
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the command line supplied this option.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Layer the current value came from.
    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    /// Whether the current value differs from the default.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.value != self.default
    }
}

/// The options of one command invocation, in registration order.
#[derive(Debug, Clone, Default)]
pub struct FlagRegistry {
    flags: Vec<Flag>,
}

impl FlagRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { flags: Vec::new() }
    }

    /// Registers an option. Returns false if the name is already taken.
    pub fn register(&mut self, flag: Flag) -> bool {
        if self.get(flag.name()).is_some() {
            return false;
        }
        self.flags.push(flag);
        true
    }

    /// Builds the registry for the innermost subcommand selected by `matches`.
    ///
    /// `root` is the unbuilt root command the matches were parsed with.
    #[must_use]
    pub fn for_invocation(root: &clap::Command, matches: &ArgMatches) -> Self {
        let mut root = root.clone();
        root.build();

        let mut command = &root;
        let mut matches = matches;
        while let Some((name, sub_matches)) = matches.subcommand() {
            let Some(sub) = command.find_subcommand(name) else {
                break;
            };
            command = sub;
            matches = sub_matches;
        }

        Self::from_command(command, matches)
    }

    /// Builds the registry from a built command and its own matches.
    #[must_use]
    pub fn from_command(command: &clap::Command, matches: &ArgMatches) -> Self {
        let mut registry = Self::new();

        for arg in command.get_arguments() {
            if arg.is_positional() || is_informational(arg.get_action()) {
                continue;
            }

            let id = arg.get_id().as_str();
            let name = arg.get_long().unwrap_or(id);
            let default = arg
                .get_default_values()
                .iter()
                .map(|v| v.to_string_lossy())
                .collect::<Vec<_>>()
                .join(",");

            let mut flag = Flag::new(name, default);
            if matches!(matches.value_source(id), Some(ValueSource::CommandLine)) {
                let raw = matches
                    .try_get_raw(id)
                    .ok()
                    .flatten()
                    .map(|values| {
                        values
                            .map(|v| v.to_string_lossy().into_owned())
                            .collect::<Vec<_>>()
                            .join(",")
                    })
                    .unwrap_or_default();
                flag = flag.set_on_command_line(raw);
            }

            registry.register(flag);
        }

        registry
    }

    /// Looks up an option by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Iterates options in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    /// Number of registered options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns true if no options are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Current value of an option, if registered.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(Flag::value)
    }

    /// Current value of an option that must be registered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownOption`] if the option is not registered.
    pub fn require(&self, name: &str) -> Result<&str, ConfigError> {
        self.value(name).ok_or_else(|| ConfigError::UnknownOption {
            option: name.to_string(),
        })
    }

    /// Parses an option's current value.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is unknown or its value does not parse.
    pub fn parse<T>(&self, name: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.require(name)?;
        raw.trim()
            .parse()
            .map_err(|e| ConfigError::invalid_value(name, raw, e))
    }

    /// Reads a boolean switch. An empty value counts as `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is unknown or not a boolean.
    pub fn flag(&self, name: &str) -> Result<bool, ConfigError> {
        let raw = self.require(name)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "0" => Ok(false),
            "true" | "1" => Ok(true),
            _ => Err(ConfigError::invalid_value(
                name,
                raw,
                "expected true or false",
            )),
        }
    }

    /// Writes resolved values back into the registry.
    ///
    /// A value is written only when it differs from both the option's default
    /// and its current value; explicit options are never touched. Returns the
    /// names written.
    pub fn apply(&mut self, resolution: &Resolution) -> Vec<String> {
        let mut written = Vec::new();

        for flag in &mut self.flags {
            if flag.explicit {
                continue;
            }
            let Some(resolved) = resolution.get(&flag.name) else {
                continue;
            };
            if resolved.value == flag.default || resolved.value == flag.value {
                continue;
            }
            flag.value.clone_from(&resolved.value);
            flag.source = resolved.source;
            written.push(flag.name.clone());
        }

        written
    }

    /// Options whose current value differs from their default.
    pub fn changed(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter().filter(|f| f.is_changed())
    }
}

const fn is_informational(action: &ArgAction) -> bool {
    matches!(
        action,
        ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong | ArgAction::Version
    )
}
