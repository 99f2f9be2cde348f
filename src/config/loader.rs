// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// File name looked up in the current directory when `--config` is omitted.
pub const DEFAULT_CONFIG_FILE: &str = "Autobuild.toml";

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for the
/// semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve which config to use.
///
/// - An explicit path must exist and be valid.
/// - Without one, `Autobuild.toml` is used if present, otherwise defaults.
///
/// Returns the config together with the directory relative paths in it are
/// resolved against.
pub fn load_or_default(explicit: Option<&Path>) -> Result<(ConfigFile, PathBuf)> {
    match explicit {
        Some(path) => {
            let cfg = load_and_validate(path)?;
            Ok((cfg, config_root_dir(path)))
        }
        None => {
            let path = default_config_path();
            if path.is_file() {
                let cfg = load_and_validate(&path)?;
                Ok((cfg, config_root_dir(&path)))
            } else {
                tracing::debug!("no {DEFAULT_CONFIG_FILE} found; using built-in defaults");
                Ok((ConfigFile::default(), current_dir()))
            }
        }
    }
}

/// Helper to resolve the default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Directory that relative paths in the config at `config_path` refer to.
///
/// A bare file name (parent = "") falls back to the current directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => current_dir(),
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
