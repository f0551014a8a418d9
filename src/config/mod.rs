mod types;

pub use types::{AuthorConfig, Config, ExecutorConfig, PostConfig};

use crate::error::{BlogqlError, Result};
use std::fs;

/// Load configuration from a TOML file
pub fn load_config(path: &str) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .map_err(|e| BlogqlError::Config(format!("Failed to read config file '{}': {}", path, e)))?;

    let config: Config = toml::from_str(&contents)?;

    config.validate().map_err(BlogqlError::Config)?;

    Ok(config)
}

/// Save configuration to a TOML file
pub fn save_config(config: &Config, path: &str) -> Result<()> {
    config.validate().map_err(BlogqlError::Config)?;

    let toml_string = to_toml(config)?;
    fs::write(path, toml_string)
        .map_err(|e| BlogqlError::Config(format!("Failed to write config file '{}': {}", path, e)))?;

    Ok(())
}

/// Render configuration as pretty TOML
pub fn to_toml(config: &Config) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
