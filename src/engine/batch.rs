// src/engine/batch.rs

use tracing::info;

use crate::build::{BuildOrchestrator, Compiler};
use crate::catalog::FileSet;
use crate::errors::Result;

/// Totals of a one-shot build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub built: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Build every catalogued file once, in catalog order.
///
/// Failures do not stop the run; they are counted and decide the overall
/// status only after every file has been attempted.
pub fn run_batch<C: Compiler>(
    orchestrator: &mut BuildOrchestrator<C>,
    files: &FileSet,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for path in files {
        let outcome = orchestrator.build_file(path)?;
        if outcome.is_failure() {
            summary.failed += 1;
        } else {
            summary.built += 1;
        }
    }

    info!(built = summary.built, failed = summary.failed, "batch build finished");
    Ok(summary)
}
