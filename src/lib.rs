//! falcoctl: the control tool for running Falco.
//!
//! A library for resolving command options from flags, environment,
//! config file and defaults, and for signal-aware cancellation.

pub mod config;
pub mod signal;
