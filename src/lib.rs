// src/lib.rs

pub mod build;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod watch;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info};

use crate::build::{BuildOrchestrator, CommandCompiler, Compiler, Console};
use crate::catalog::{scan_roots, FileSet};
use crate::cli::CliArgs;
use crate::config::{load_settings, Settings};
use crate::engine::{run_batch, RunStatus, WatchRuntime};
use crate::errors::{Result, RewatchError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{BackendKind, EventStream};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - source catalog
/// - the external compiler command
/// - batch build or watch loop with Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<RunStatus> {
    let settings = Arc::new(load_settings(&args)?);
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    if settings.dry_run {
        let files = catalog(fs.as_ref(), &settings)?;
        print_dry_run(&settings, &files, &mut Console::stdio())?;
        return Ok(RunStatus::Success);
    }

    let cmd = settings
        .compiler_cmd
        .clone()
        .ok_or_else(|| RewatchError::ConfigError("no compiler configured".to_string()))?;
    let compiler = CommandCompiler::new(cmd);

    run_with(
        settings,
        fs,
        compiler,
        Console::stdio(),
        watch::probe,
        engine::shutdown::ctrl_c(),
    )
    .await
}

/// Run one invocation with every collaborator injected.
///
/// `probe` is consulted once, only in watch mode, to pick the change backend.
/// `shutdown` ends watch mode when it completes.
///
/// Fatal setup problems (unreadable directory, uncreatable target) are
/// returned before anything is built or watched.
pub async fn run_with<C, P, S>(
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
    compiler: C,
    console: Console,
    probe: P,
    shutdown: S,
) -> Result<RunStatus>
where
    C: Compiler,
    P: FnOnce() -> BackendKind,
    S: Future<Output = ()>,
{
    let files = catalog(fs.as_ref(), &settings)?;

    let mut orchestrator = BuildOrchestrator::new(settings.clone(), fs.clone(), compiler, console);
    orchestrator.prepare_target()?;

    if !settings.watch {
        let summary = run_batch(&mut orchestrator, &files)?;
        return Ok(if summary.success() {
            RunStatus::Success
        } else {
            RunStatus::Failed
        });
    }

    let kind = probe();
    info!(?kind, files = files.len(), "starting watch session");
    let stream = EventStream::open(kind, &files, &settings, fs);

    let report = WatchRuntime::new(orchestrator, stream).run(shutdown).await?;
    debug!(?report, "watch session finished");

    // Both a user interrupt and a closed backend are clean exits.
    Ok(RunStatus::Success)
}

/// Scan the configured roots, apply the `--output` single-file rule and make
/// sure no two files share an output path.
fn catalog(fs: &dyn FileSystem, settings: &Settings) -> Result<FileSet> {
    let files = scan_roots(fs, &settings.roots, &settings.source_ext)?;

    if settings.output_file.is_some() {
        if files.len() != 1 {
            return Err(RewatchError::ConfigError(format!(
                "--output needs exactly one input file, found {}",
                files.len()
            )));
        }
    } else if !settings.prints_to_stdout() {
        build::ensure_distinct_outputs(&files, &settings.target_dir, &settings.target_ext)?;
    }

    Ok(files)
}

/// Dry-run output: every catalogued file and where it would be written.
fn print_dry_run(settings: &Settings, files: &FileSet, console: &mut Console) -> Result<()> {
    console.status("rewatch dry-run")?;
    console.status(&format!(
        "  compiler = {}",
        settings.compiler_cmd.as_deref().unwrap_or("<none>")
    ))?;
    console.status(&format!("  target_dir = {}", settings.target_dir.display()))?;
    console.status("")?;

    console.status(&format!("files ({}):", files.len()))?;
    for path in files {
        let dest = match (&settings.output_file, settings.prints_to_stdout()) {
            (Some(explicit), _) => explicit.display().to_string(),
            (None, true) => "<stdout>".to_string(),
            (None, false) => build::output_path_for(
                path.as_path(),
                &settings.target_dir,
                &settings.target_ext,
            )
            .display()
            .to_string(),
        };
        console.status(&format!("  {path} -> {dest}"))?;
    }

    debug!("dry-run complete (no compilation)");
    Ok(())
}
