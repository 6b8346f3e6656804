//! Where the config file lives, and seeding it.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use trellis_common::ConfigError;

use super::template::default_config_toml;

const APP_DIR: &str = "trellis";
const FILE_NAME: &str = "config.toml";

/// `<platform config dir>/trellis/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Write the commented template to `path`, creating parent directories.
///
/// An existing file is left alone. Returns whether a file was written.
pub fn create_default_config(path: &Path) -> Result<bool, ConfigError> {
    let io_error = |at: &Path, source| ConfigError::Io {
        path: at.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "config already present, not seeding");
            return Ok(false);
        }
        Err(e) => return Err(io_error(path, e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| io_error(path, e))?;

    info!(path = %path.display(), "default config written");
    Ok(true)
}
