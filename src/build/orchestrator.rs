// src/build/orchestrator.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::build::compiler::Compiler;
use crate::build::console::Console;
use crate::build::output::output_path_for;
use crate::catalog::SourcePath;
use crate::config::{OutputMode, Settings};
use crate::errors::{Diagnostic, Result, RewatchError};
use crate::fs::FileSystem;

/// Result of building one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Output written to this path.
    Written(PathBuf),
    /// Output sent to the combined stdout stream.
    Printed,
    /// Source vanished or could not be read.
    ReadFailed(String),
    CompileFailed(Diagnostic),
    WriteFailed(String),
}

impl BuildOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            BuildOutcome::ReadFailed(_)
                | BuildOutcome::CompileFailed(_)
                | BuildOutcome::WriteFailed(_)
        )
    }
}

/// Compiles single files and reports the result.
///
/// Per-file problems come back as a failed [`BuildOutcome`] and are reported
/// on the console; only console IO failures surface as `Err`.
pub struct BuildOrchestrator<C: Compiler> {
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
    compiler: C,
    console: Console,
}

impl<C: Compiler> std::fmt::Debug for BuildOrchestrator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildOrchestrator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<C: Compiler> BuildOrchestrator<C> {
    pub fn new(
        settings: Arc<Settings>,
        fs: Arc<dyn FileSystem>,
        compiler: C,
        console: Console,
    ) -> Self {
        Self {
            settings,
            fs,
            compiler,
            console,
        }
    }

    pub fn console(&mut self) -> &mut Console {
        &mut self.console
    }

    /// Create the target directory (idempotent). Skipped when output goes
    /// to stdout, since nothing is written below it then.
    pub fn prepare_target(&self) -> Result<()> {
        if self.settings.output_mode == OutputMode::Print {
            return Ok(());
        }

        let target = &self.settings.target_dir;
        self.fs
            .create_dir_all(target)
            .map_err(|source| RewatchError::TargetSetup {
                path: target.clone(),
                source,
            })?;

        if !self.fs.is_dir(target) {
            return Err(RewatchError::TargetSetup {
                path: target.clone(),
                source: anyhow::anyhow!("not a directory"),
            });
        }

        debug!(target = %target.display(), "target directory ready");
        Ok(())
    }

    /// Where the compiled form of `input` is written.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        match &self.settings.output_file {
            Some(explicit) => explicit.clone(),
            None => output_path_for(
                input,
                &self.settings.target_dir,
                &self.settings.target_ext,
            ),
        }
    }

    /// Read, compile and write one file, reporting the outcome.
    pub fn build_file(&mut self, path: &SourcePath) -> Result<BuildOutcome> {
        let outcome = self.build_inner(path);
        self.report(path, &outcome)?;
        Ok(outcome)
    }

    fn build_inner(&mut self, path: &SourcePath) -> BuildOutcome {
        let source = match self.fs.read_to_string(path.as_path()) {
            Ok(s) => s,
            Err(err) => return BuildOutcome::ReadFailed(format!("{err:#}")),
        };

        let output = match self.compiler.compile(&source) {
            Ok(out) => out,
            Err(diag) => return BuildOutcome::CompileFailed(diag),
        };

        match self.settings.output_mode {
            OutputMode::Print => match self.console.emit(&output) {
                Ok(()) => BuildOutcome::Printed,
                Err(err) => BuildOutcome::WriteFailed(err.to_string()),
            },
            OutputMode::Files => {
                let target = self.output_path(path.as_path());
                match self.fs.write(&target, output.as_bytes()) {
                    Ok(()) => BuildOutcome::Written(target),
                    Err(err) => BuildOutcome::WriteFailed(format!("{err:#}")),
                }
            }
        }
    }

    fn report(&mut self, path: &SourcePath, outcome: &BuildOutcome) -> Result<()> {
        match outcome {
            BuildOutcome::Written(target) => {
                info!(path = %path, output = %target.display(), "built");
                self.console
                    .status(&format!("Built {} -> {}", path, target.display()))?;
            }
            BuildOutcome::Printed => {
                debug!(path = %path, "printed");
            }
            BuildOutcome::ReadFailed(reason) => {
                warn!(path = %path, error = %reason, "cannot read source");
                self.console.error(&format!("Error {path}: {reason}"))?;
            }
            BuildOutcome::CompileFailed(diag) => {
                warn!(path = %path, "compile failed");
                self.console.error(&format!("Error {path}: {diag}"))?;
            }
            BuildOutcome::WriteFailed(reason) => {
                warn!(path = %path, error = %reason, "cannot write output");
                self.console.error(&format!("Error {path}: {reason}"))?;
            }
        }
        Ok(())
    }
}
