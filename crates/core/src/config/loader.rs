//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings, defaults where the file is silent
    pub schema: ConfigSchema,
    /// File the settings came from; `None` when running on defaults
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from an explicit path, a discovered file, or defaults
    ///
    /// An explicit path that does not exist is an error; a missing
    /// discovered file silently falls back to defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !Path::new(p).exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_string()),
            None => find_config_file(),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        let config = Self {
            schema,
            path: config_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the menu cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.schema.menu.default_category.trim().is_empty() {
            return Err(Error::config_invalid("menu.default_category cannot be empty"));
        }
        if self.schema.display.placeholder_image.trim().is_empty() {
            return Err(Error::config_invalid("display.placeholder_image cannot be empty"));
        }
        Ok(())
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        ".menu-display.toml",
        "menu-display.toml",
        ".config/menu-display.toml",
    ];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {path}"))?;

    toml::from_str::<ConfigSchema>(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {path}"))
}
