//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the agent's TOML settings from the
//! platform config directory (or an explicit path), writes them back, and
//! falls back to defaults on first run when no file exists yet.

pub mod config;
