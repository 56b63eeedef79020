// src/errors.rs

//! Crate-wide error types.
//!
//! Fatal, session-level failures are [`RewatchError`]s. Per-file problems
//! (unreadable source, compiler diagnostics, failed writes) are *not* errors
//! at this level: they travel as [`crate::build::BuildOutcome`] values so a
//! single bad file can never unwind the watch loop.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("cannot scan {path:?}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("cannot set up target directory {path:?}: {source}")]
    TargetSetup {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("file watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, RewatchError>;

/// Human-readable message produced by the compiler for a rejected source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic(pub String);

impl Diagnostic {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.trim_end())
    }
}
