// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::ConfigFile;
use crate::config::validate::validate;
use crate::errors::Result;

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; use [`load_or_default`] for the
/// validated entry point.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load and validate a configuration file, falling back to built-in defaults
/// when the file does not exist.
///
/// A present-but-broken file is still an error; only absence is tolerated,
/// so a stock SDK install needs no config file at all.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let config = if path.exists() {
        load_from_path(path)?
    } else {
        debug!(?path, "no config file found; using defaults");
        ConfigFile::default()
    };
    validate(&config)?;
    Ok(config)
}

/// Default config path: `Devpilot.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Devpilot.toml")
}
