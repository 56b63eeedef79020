mod common;
use crate::common::builders::SettingsBuilder;
use crate::common::{example_project, init_tracing, with_timeout, within, FakeCompiler, FAIL_MARKER};

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use rewatch::build::{BuildOrchestrator, Console};
use rewatch::catalog::{scan_roots, SourcePath};
use rewatch::engine::{RunStatus, WatchExit, WatchRuntime, SHUTDOWN_NOTICE};
use rewatch::fs::mock::MockFileSystem;
use rewatch::fs::FileSystem;
use rewatch::run_with;
use rewatch::watch::{BackendKind, EventStream, PollingNotifier};

type TestResult = Result<(), Box<dyn Error>>;

/// Wait (in real time) until `path` has the expected contents.
async fn wait_for_output(fs: &MockFileSystem, path: &str, expected: &str) {
    loop {
        if fs.file_contents(path).as_deref() == Some(expected) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[test]
fn polling_reports_a_change_only_after_the_clock_advances() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("proj/a.src", "alpha");
    fs.set_modified("proj/a.src", 100);
    let files = scan_roots(&fs, &[PathBuf::from("proj")], "src").unwrap();
    let mut poller = PollingNotifier::new(&files, Arc::new(fs.clone()), Duration::from_secs(1));

    // Seed, then an unchanged timestamp, then one tick later.
    assert!(poller.sweep().is_empty());
    assert!(poller.sweep().is_empty());
    fs.set_modified("proj/a.src", 101);
    assert_eq!(poller.sweep(), vec![SourcePath::new("proj/a.src")]);
}

#[tokio::test]
async fn modified_file_is_rebuilt_until_cancelled() -> TestResult {
    init_tracing();
    let fs = example_project();
    let compiler = FakeCompiler::new();
    let settings = SettingsBuilder::new().root("proj").watch().build();
    let (console, captured) = Console::captured();
    let (tx, rx) = oneshot::channel::<()>();

    let driver = {
        let fs = fs.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            fs.add_file("proj/sub/c.src", "gamma two");
            fs.set_modified("proj/sub/c.src", 5);
            wait_for_output(&fs, "out/proj/sub/c.out", "GAMMA TWO").await;
            let _ = tx.send(());
        }
    };

    let run = run_with(
        settings,
        Arc::new(fs.clone()),
        compiler.clone(),
        console,
        || BackendKind::Polling,
        async {
            let _ = rx.await;
        },
    );

    let (status, ()) = with_timeout(async { tokio::join!(run, driver) }).await;

    assert_eq!(status?, RunStatus::Success);
    // Only the touched file was compiled; watch mode does no initial build.
    assert_eq!(compiler.compiled(), vec!["gamma two"]);
    assert!(fs.file_contents("out/proj/a.out").is_none());
    assert!(captured
        .stdout()
        .contains("Built proj/sub/c.src -> out/proj/sub/c.out"));
    assert_eq!(captured.stderr().matches(SHUTDOWN_NOTICE).count(), 1);
    Ok(())
}

#[tokio::test]
async fn cancellation_interrupts_a_long_polling_sleep() -> TestResult {
    init_tracing();
    let fs = example_project();
    let settings = SettingsBuilder::new()
        .root("proj")
        .watch()
        .poll_interval(Duration::from_secs(60))
        .build();
    let (console, captured) = Console::captured();
    let (tx, rx) = oneshot::channel::<()>();

    let driver = {
        let fs = fs.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            // Pending modification that the cancelled sweep never delivers.
            fs.set_modified("proj/a.src", 9);
            let _ = tx.send(());
        }
    };

    let run = run_with(
        settings,
        Arc::new(fs.clone()),
        FakeCompiler::new(),
        console,
        || BackendKind::Polling,
        async {
            let _ = rx.await;
        },
    );

    // The 60s sleep must be interrupted, not waited out.
    let (status, ()) = within(Duration::from_secs(2), async { tokio::join!(run, driver) }).await;

    assert_eq!(status?, RunStatus::Success);
    assert!(fs.file_contents("out/proj/a.out").is_none());
    assert_eq!(captured.stderr().trim_end(), SHUTDOWN_NOTICE);
    Ok(())
}

#[tokio::test]
async fn failing_file_does_not_stop_the_watch_loop() -> TestResult {
    init_tracing();
    let fs = example_project();
    let settings = SettingsBuilder::new().root("proj").watch().build();
    let files = scan_roots(&fs, &settings.roots, &settings.source_ext)?;
    let fs_dyn: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let (console, captured) = Console::captured();

    let orchestrator =
        BuildOrchestrator::new(settings.clone(), fs_dyn.clone(), FakeCompiler::new(), console);
    orchestrator.prepare_target()?;
    let stream = EventStream::open(BackendKind::Polling, &files, &settings, fs_dyn);
    let runtime = WatchRuntime::new(orchestrator, stream);
    let (tx, rx) = oneshot::channel::<()>();

    let driver = {
        let fs = fs.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            fs.add_file("proj/a.src", format!("alpha {FAIL_MARKER}"));
            fs.set_modified("proj/a.src", 3);
            tokio::time::sleep(Duration::from_millis(40)).await;
            fs.set_modified("proj/b.src", 3);
            wait_for_output(&fs, "out/proj/b.out", "BETA").await;
            let _ = tx.send(());
        }
    };

    let run = runtime.run(async {
        let _ = rx.await;
    });
    let (report, ()) = with_timeout(async { tokio::join!(run, driver) }).await;
    let report = report?;

    assert_eq!(report.exit, WatchExit::Cancelled);
    assert_eq!(report.built, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.released, 0);
    assert!(captured.stderr().contains("Error proj/a.src"));
    assert!(captured.stderr().contains(SHUTDOWN_NOTICE));
    Ok(())
}
