//! Precedence resolution of registered options.
//!
//! [`resolve`] does not touch the registry: it returns a [`Resolution`] that the
//! caller applies with [`FlagRegistry::apply`].

use std::collections::{BTreeMap, HashSet};

use super::defaults;
use super::registry::FlagRegistry;
use super::store::{ConfigStore, Resolved};

/// Option names kept out of environment and file influence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: HashSet<String>,
}

impl ExclusionSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The global exclusions: `config`, `loglevel` and `help`.
    #[must_use]
    pub fn global() -> Self {
        Self::new()
            .with(defaults::CONFIG_FLAG)
            .with(defaults::LOG_LEVEL_FLAG)
            .with(defaults::HELP_FLAG)
    }

    /// Adds a name to the set.
    #[must_use]
    pub fn with(mut self, name: &str) -> Self {
        self.names.insert(name.to_lowercase());
        self
    }

    /// Returns true if the option must not be resolved.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }
}

/// Effective value of every visited option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    values: BTreeMap<String, Resolved>,
}

impl Resolution {
    /// The resolved value for an option, if it was visited.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Resolved> {
        self.values.get(&name.to_lowercase())
    }

    /// Returns true if no option was visited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Computes the effective value of every non-excluded option.
///
/// For each option: its default is registered as the store's fallback, an
/// explicit command-line value is bound so it outranks every other layer, and
/// the store is asked for the winning value.
pub fn resolve(
    registry: &FlagRegistry,
    store: &mut ConfigStore,
    exclusions: &ExclusionSet,
) -> Resolution {
    let mut values = BTreeMap::new();

    for flag in registry.iter() {
        if exclusions.contains(flag.name()) {
            continue;
        }

        store.set_default(flag.name(), flag.default_value());
        if flag.is_explicit() {
            store.bind_flag(flag.name(), flag.value());
        }

        if let Some(resolved) = store.get(flag.name()) {
            values.insert(flag.name().to_lowercase(), resolved);
        }
    }

    Resolution { values }
}

/// Resolves the registry against the store and writes the result back.
///
/// Returns the names written. Emits a debug trace of every option whose value
/// now differs from its default.
pub fn reconcile(
    registry: &mut FlagRegistry,
    store: &mut ConfigStore,
    exclusions: &ExclusionSet,
) -> Vec<String> {
    let resolution = resolve(registry, store, exclusions);
    let written = registry.apply(&resolution);

    let options = registry
        .changed()
        .map(|f| format!("{}={} ({})", f.name(), f.value(), f.source()))
        .collect::<Vec<_>>()
        .join(", ");
    tracing::debug!(options = %options, "running with options");

    written
}
