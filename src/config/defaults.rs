//! Default values for configuration options.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

/// Prefix for environment variables (`FALCOCTL_<OPTION_NAME>`).
pub const ENV_PREFIX: &str = "FALCOCTL";

/// Directory under the user's home holding the default config file.
pub const CONFIG_DIR: &str = ".falcoctl";

/// Base name of the default config file.
pub const CONFIG_NAME: &str = "config";

/// Extension (and content type) of the default config file.
pub const CONFIG_EXTENSION: &str = "yaml";

/// Default log level.
pub const LOG_LEVEL: &str = "info";

/// Long name of the config file flag.
pub const CONFIG_FLAG: &str = "config";

/// Long name of the log level flag.
pub const LOG_LEVEL_FLAG: &str = "loglevel";

/// Long name of the help flag.
pub const HELP_FLAG: &str = "help";

/// Default OCI namespace used by install and delete.
pub const NAMESPACE: &str = "falco";

/// Default artifact tag requested by install.
pub const TAG: &str = "latest";

/// Default maximum number of search results.
pub const SEARCH_LIMIT: u32 = 20;

