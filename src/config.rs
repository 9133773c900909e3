//! Configuration file support for aibom-scan.
//!
//! Provides TOML-based configuration through `.aibom.toml` files.
//! Every setting mirrors a command-line flag; the flag always wins.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::shared::error::AibomError;
use crate::shared::Result;

const CONFIG_FILENAME: &str = ".aibom.toml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub token: Option<String>,
    pub exclude_categories: Option<Vec<String>>,
    pub fail_on_detect: Option<bool>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, toml::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| AibomError::ConfigError {
        path: path.to_path_buf(),
        details: format!(
            "{}\n\n💡 Hint: Check that the file exists and is readable",
            e
        ),
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| AibomError::ConfigError {
        path: path.to_path_buf(),
        details: format!("{}\n\n💡 Hint: Ensure the file contains valid TOML syntax", e),
    })?;

    warn_unknown_fields(&config);
    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
