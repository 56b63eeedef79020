mod common;
use crate::common::builders::SettingsBuilder;
use crate::common::{init_tracing, with_timeout, within, FakeCompiler};

use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use rewatch::build::{BuildOrchestrator, Console};
use rewatch::catalog::{scan_roots, FileSet, SourcePath};
use rewatch::config::Settings;
use rewatch::engine::{WatchExit, WatchRuntime, SHUTDOWN_NOTICE};
use rewatch::fs::{FileSystem, RealFileSystem};
use rewatch::watch::{probe, BackendKind, EventStream};

type TestResult = Result<(), Box<dyn Error>>;

/// `root/a.src` and `root/sub/c.src`, catalogued for a watch session.
fn watched_project(
    root: &Path,
) -> Result<(Arc<Settings>, Arc<dyn FileSystem>, FileSet), Box<dyn Error>> {
    std::fs::create_dir_all(root.join("sub"))?;
    std::fs::write(root.join("a.src"), "alpha")?;
    std::fs::write(root.join("sub/c.src"), "gamma")?;

    let settings = SettingsBuilder::new()
        .root(&root.to_string_lossy())
        .target(root.join("out"))
        .watch()
        .build();
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let files = scan_roots(fs.as_ref(), &settings.roots, &settings.source_ext)?;
    Ok((settings, fs, files))
}

fn native_available() -> bool {
    if probe() == BackendKind::Native {
        return true;
    }
    eprintln!("native change notification unavailable; skipping");
    false
}

#[tokio::test]
async fn native_stream_reports_written_file_and_releases_every_directory() -> TestResult {
    init_tracing();
    if !native_available() {
        return Ok(());
    }

    let dir = tempfile::tempdir()?;
    let root = dir.path().to_path_buf();
    let (settings, fs, files) = watched_project(&root)?;
    assert_eq!(files.len(), 2);

    let mut stream = EventStream::open(BackendKind::Native, &files, &settings, fs);
    assert_eq!(stream.backend_kind(), BackendKind::Native);

    // A non-source write in the same directory is filtered out.
    std::fs::write(root.join("sub/notes.txt"), "ignored")?;
    std::fs::write(root.join("sub/c.src"), "gamma two")?;

    let changed = with_timeout(stream.next()).await;
    assert_eq!(changed, Some(SourcePath::new(root.join("sub/c.src"))));

    assert_eq!(stream.close(), files.watch_targets().len());
    Ok(())
}

#[tokio::test]
async fn cancellation_interrupts_a_blocked_native_read() -> TestResult {
    init_tracing();
    if !native_available() {
        return Ok(());
    }

    let dir = tempfile::tempdir()?;
    let (settings, fs, files) = watched_project(dir.path())?;

    let (console, captured) = Console::captured();
    let orchestrator =
        BuildOrchestrator::new(settings.clone(), fs.clone(), FakeCompiler::new(), console);
    let stream = EventStream::open(BackendKind::Native, &files, &settings, fs);
    assert_eq!(stream.backend_kind(), BackendKind::Native);
    let (tx, rx) = oneshot::channel::<()>();

    // Nothing is written, so the loop sits in the native read until shutdown.
    let run = WatchRuntime::new(orchestrator, stream).run(async {
        let _ = rx.await;
    });
    let interrupt = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = tx.send(());
    };

    let (report, ()) = within(Duration::from_secs(2), async { tokio::join!(run, interrupt) }).await;
    let report = report?;

    assert_eq!(report.exit, WatchExit::Cancelled);
    assert_eq!(report.built + report.failed, 0);
    assert_eq!(report.released, files.watch_targets().len());
    assert_eq!(captured.stderr().matches(SHUTDOWN_NOTICE).count(), 1);
    Ok(())
}
