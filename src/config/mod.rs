// src/config/mod.rs

//! Configuration loading and validation for rewatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the merged [`Settings`] (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Layer CLI flags over it and validate the result (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_from_path, load_optional, load_settings};
pub use model::{
    CompilerSection, OutputMode, OutputSection, RawConfigFile, Settings, DEFAULT_POLL_INTERVAL,
};
pub use validate::{resolve_settings, validate_settings};
