//! Parsing and validation of `clockpump.toml` harness configuration files.
//!
//! This crate reads the harness configuration and produces a strongly-typed
//! [`HarnessConfig`] whose simulation section can be applied directly to a
//! [`SimContext`](clockpump_sim::SimContext).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_config, load_config_file, load_config_from_str, validate_config, validate_counter,
    CONFIG_FILE_NAME,
};
pub use types::*;
