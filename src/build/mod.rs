// src/build/mod.rs

//! Per-file build step: read source, run the compiler, write (or print) the
//! output and report what happened.

pub mod compiler;
pub mod console;
pub mod orchestrator;
pub mod output;

pub use compiler::{CommandCompiler, Compiler};
pub use console::{CapturedOutput, Console};
pub use orchestrator::{BuildOrchestrator, BuildOutcome};
pub use output::{ensure_distinct_outputs, output_path_for};
