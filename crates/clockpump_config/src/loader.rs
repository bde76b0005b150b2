//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{CounterSection, HarnessConfig};
use std::path::Path;

/// File name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "clockpump.toml";

/// Loads and validates `clockpump.toml` from a project directory.
///
/// A missing file is not an error: the defaults are returned instead.
pub fn load_config(project_dir: &Path) -> Result<HarnessConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        return Ok(HarnessConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<HarnessConfig, ConfigError> {
    let config: HarnessConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates value ranges that the types alone do not enforce.
///
/// Run again after command-line overrides are merged into a loaded config.
pub fn validate_config(config: &HarnessConfig) -> Result<(), ConfigError> {
    validate_counter(&config.counter)
}

/// Validates the counter testbench parameters.
///
/// Also used by the testbench itself once `+name=value` overrides are applied.
pub fn validate_counter(counter: &CounterSection) -> Result<(), ConfigError> {
    if !(1..=32).contains(&counter.width) {
        return Err(ConfigError::ValidationError(format!(
            "counter.width must be 1..=32, got {}",
            counter.width
        )));
    }
    if counter.hold_cycles == 0 {
        return Err(ConfigError::ValidationError(
            "counter.hold_cycles must be at least 1".to_string(),
        ));
    }
    Ok(())
}
