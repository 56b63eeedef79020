// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `rewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rewatch",
    version,
    about = "Compile source files once, or keep recompiling them as they change.",
    long_about = None
)]
pub struct CliArgs {
    /// Files or directories to compile. Directories are scanned recursively.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Watch the inputs and recompile files as they change.
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Output root; compiled files mirror the input layout below it.
    ///
    /// Default: `[output].target_dir` from the config file, else `.`.
    #[arg(short = 't', long = "target", value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Print all compiled output to stdout instead of writing files.
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Write the output of a single input file to this path.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Compiler command; it reads source on stdin and writes output to stdout.
    #[arg(short = 'c', long = "compiler", value_name = "CMD")]
    pub compiler: Option<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Rewatch.toml` in the current directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Extension of source files (without the dot).
    #[arg(long, value_name = "EXT")]
    pub source_ext: Option<String>,

    /// Extension given to compiled files (without the dot).
    #[arg(long, value_name = "EXT")]
    pub target_ext: Option<String>,

    /// List the catalogued files and their output paths, compile nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `REWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
