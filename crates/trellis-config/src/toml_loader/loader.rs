//! Reading the config file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};
use trellis_common::ConfigError;

use crate::schema::TrellisConfig;
use crate::validation;

use super::paths::{create_default_config, default_config_path};

/// Parse the TOML file at `path`.
///
/// Missing fields take their serde defaults. Values that fail validation
/// are logged and kept; [`crate::load_config_from`] is the strict entry.
pub fn load_from_path(path: &Path) -> Result<TrellisConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: TrellisConfig =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), error = %e, "config has invalid values");
    }
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load `path`, seeding it with the commented template when absent.
pub fn load_or_create(path: &Path) -> Result<TrellisConfig, ConfigError> {
    match load_from_path(path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(path)?;
            Ok(TrellisConfig::default())
        }
        loaded => loaded,
    }
}

/// Load the config at the platform default path, seeding it on first run.
///
/// Linux: `~/.config/trellis/config.toml`. macOS:
/// `~/Library/Application Support/trellis/config.toml`.
pub fn load_default() -> Result<TrellisConfig, ConfigError> {
    load_or_create(&default_config_path()?)
}
