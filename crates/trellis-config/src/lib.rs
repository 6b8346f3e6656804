//! Trellis configuration.
//!
//! TOML-based configuration for the host application. Every section uses
//! serde defaults so a partial file (or no file at all) works.
//!
//! ```rust,no_run
//! # fn main() -> Result<(), trellis_common::ConfigError> {
//! let config = trellis_config::load_config()?;
//! println!("surface root: {}", config.app.root.display());
//! # Ok(())
//! # }
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

use std::path::Path;

pub use schema::{AppConfig, LoggingConfig, TrellisConfig, WebViewSettings};
pub use toml_loader::{default_config_path, load_default, load_from_path, load_or_create};

use trellis_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<TrellisConfig, ConfigError> {
    load_config_from(None)
}

/// Load and validate `explicit` if given, else the platform default file.
///
/// Unlike the default file, an explicit path is never created.
pub fn load_config_from(explicit: Option<&Path>) -> Result<TrellisConfig, ConfigError> {
    let config = match explicit {
        Some(path) => load_from_path(path)?,
        None => load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}
