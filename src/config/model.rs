// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Polling sweep interval. Fixed; not exposed on the CLI or in the config file.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const DEFAULT_SOURCE_EXT: &str = "src";
pub const DEFAULT_TARGET_EXT: &str = "out";

/// Configuration file as read from TOML, before merging with CLI flags.
///
/// ```toml
/// [compiler]
/// command = "mycc --stdin"
/// source_ext = "src"
/// target_ext = "out"
///
/// [output]
/// target_dir = "build"
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub compiler: CompilerSection,

    #[serde(default)]
    pub output: OutputSection,
}

/// `[compiler]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerSection {
    /// Shell command that reads source on stdin and writes output on stdout.
    #[serde(default)]
    pub command: Option<String>,

    #[serde(default = "default_source_ext")]
    pub source_ext: String,

    #[serde(default = "default_target_ext")]
    pub target_ext: String,
}

fn default_source_ext() -> String {
    DEFAULT_SOURCE_EXT.to_string()
}

fn default_target_ext() -> String {
    DEFAULT_TARGET_EXT.to_string()
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            command: None,
            source_ext: default_source_ext(),
            target_ext: default_target_ext(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default)]
    pub target_dir: Option<PathBuf>,
}

/// Where compiled output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One output file per input, mirrored under the target directory.
    #[default]
    Files,
    /// Everything to stdout as one combined stream; no status lines.
    Print,
}

/// Validated, immutable settings for one invocation.
///
/// Built once from CLI flags layered over the config file and handed to the
/// catalog, the watch backends and the build orchestrator.
#[derive(Debug, Clone)]
pub struct Settings {
    pub roots: Vec<PathBuf>,
    pub target_dir: PathBuf,
    pub source_ext: String,
    pub target_ext: String,
    pub output_mode: OutputMode,
    /// Explicit output path for a single input (`-o`).
    pub output_file: Option<PathBuf>,
    pub compiler_cmd: Option<String>,
    pub watch: bool,
    pub dry_run: bool,
    pub poll_interval: Duration,
}

impl Settings {
    /// Settings with defaults for everything but the roots.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            target_dir: PathBuf::from("."),
            source_ext: default_source_ext(),
            target_ext: default_target_ext(),
            output_mode: OutputMode::Files,
            output_file: None,
            compiler_cmd: None,
            watch: false,
            dry_run: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn prints_to_stdout(&self) -> bool {
        self.output_mode == OutputMode::Print
    }
}
