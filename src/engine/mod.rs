// src/engine/mod.rs

//! Orchestration engine for rewatch.
//!
//! - [`batch`] builds a fixed catalog once.
//! - [`runtime`] runs the watch loop: pull a changed file, build it, repeat,
//!   until the shutdown signal fires or the backend runs dry.
//! - [`shutdown`] provides the production shutdown signal (Ctrl-C).

pub mod batch;
pub mod runtime;
pub mod shutdown;

pub use batch::{run_batch, BatchSummary};
pub use runtime::{WatchExit, WatchReport, WatchRuntime, SHUTDOWN_NOTICE};

/// Overall result of an invocation, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failed,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failed => 1,
        }
    }
}
