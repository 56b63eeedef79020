// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, Settings};
use crate::config::validate::resolve_settings;
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** merge CLI flags or
/// validate. Use [`load_settings`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load the config file if present.
///
/// An explicitly requested path must exist. The default path is optional:
/// when it is missing, built-in defaults are used.
pub fn load_optional(explicit: Option<&Path>) -> Result<RawConfigFile> {
    match explicit {
        Some(path) => load_from_path(path),
        None => {
            let path = default_config_path();
            if path.is_file() {
                debug!(path = %path.display(), "loading default config file");
                load_from_path(&path)
            } else {
                Ok(RawConfigFile::default())
            }
        }
    }
}

/// Recommended entry point: read the config file (if any), layer the CLI
/// flags over it and validate the result.
pub fn load_settings(args: &CliArgs) -> Result<Settings> {
    let raw = load_optional(args.config.as_deref())?;
    resolve_settings(args, raw)
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Rewatch.toml` in the current working
/// directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Rewatch.toml")
}
