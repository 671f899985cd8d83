//! Environment variable layer.
//!
//! An option `opt-name` is read from `<PREFIX>_OPT_NAME`: dashes become
//! underscores and the whole key is uppercased. No other transliteration applies.

use std::collections::HashMap;

/// Snapshot of the environment, looked up by option name.
#[derive(Debug, Clone, Default)]
pub struct EnvLayer {
    prefix: String,
    vars: HashMap<String, String>,
}

impl EnvLayer {
    /// Captures the current process environment.
    ///
    /// Variables that are not valid Unicode are skipped.
    #[must_use]
    pub fn from_process(prefix: &str) -> Self {
        Self::from_vars(prefix, std::env::vars_os().filter_map(|(k, v)| {
            Some((k.into_string().ok()?, v.into_string().ok()?))
        }))
    }

    /// Builds a layer from an explicit set of variables (useful for testing).
    pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: prefix.to_uppercase(),
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// The environment variable name for an option.
    #[must_use]
    pub fn key_for(&self, name: &str) -> String {
        let key = name.replace('-', "_").to_uppercase();
        if self.prefix.is_empty() {
            key
        } else {
            format!("{}_{key}", self.prefix)
        }
    }

    /// Looks up an option's value. Empty variables count as unset.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(&self.key_for(name))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}
