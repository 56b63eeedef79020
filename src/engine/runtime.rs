// src/engine/runtime.rs

use std::fmt;
use std::future::Future;

use tracing::{debug, error, info};

use crate::build::{BuildOrchestrator, Compiler};
use crate::errors::Result;
use crate::watch::EventStream;

/// Printed exactly once when the user interrupts watch mode.
pub const SHUTDOWN_NOTICE: &str = "Quitting...";

/// How a watch session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchExit {
    /// The shutdown signal fired (e.g. Ctrl-C).
    Cancelled,
    /// The backend stopped producing events.
    StreamEnded,
}

/// Summary of a finished watch session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchReport {
    pub exit: WatchExit,
    pub built: usize,
    pub failed: usize,
    /// Watch registrations released at the exit point.
    pub released: usize,
}

/// Pulls changed files from an [`EventStream`] and rebuilds each one.
///
/// The loop is strictly sequential: a file is fully built before the next
/// event is pulled. Per-file failures are reported and the loop continues.
pub struct WatchRuntime<C: Compiler> {
    orchestrator: BuildOrchestrator<C>,
    stream: EventStream,
}

impl<C: Compiler> fmt::Debug for WatchRuntime<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRuntime")
            .field("stream", &self.stream)
            .finish_non_exhaustive()
    }
}

impl<C: Compiler> WatchRuntime<C> {
    pub fn new(orchestrator: BuildOrchestrator<C>, stream: EventStream) -> Self {
        Self {
            orchestrator,
            stream,
        }
    }

    /// Main watch loop.
    ///
    /// `shutdown` completing while the loop waits for the next event (native
    /// read or polling sleep) interrupts that wait and wins over anything the
    /// stream would have returned. Every exit path goes through the same
    /// teardown: watch registrations are released, and on cancellation the
    /// shutdown notice is printed once. Any other error is returned as-is.
    pub async fn run<S>(mut self, shutdown: S) -> Result<WatchReport>
    where
        S: Future<Output = ()>,
    {
        info!(backend = ?self.stream.backend_kind(), "watch loop started");
        tokio::pin!(shutdown);

        let mut built = 0;
        let mut failed = 0;

        let result: Result<WatchExit> = loop {
            let pulled = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                next = self.stream.next() => Some(next),
            };

            let path = match pulled {
                None => break Ok(WatchExit::Cancelled),
                Some(Some(path)) => path,
                Some(None) => break Ok(WatchExit::StreamEnded),
            };

            debug!(path = %path, "change event");
            match self.orchestrator.build_file(&path) {
                Ok(outcome) if outcome.is_failure() => failed += 1,
                Ok(_) => built += 1,
                Err(err) => break Err(err),
            }
        };

        let released = self.stream.close();

        match result {
            Ok(exit) => {
                if exit == WatchExit::Cancelled {
                    info!("shutdown requested, stopping watch loop");
                    self.orchestrator.console().notice(SHUTDOWN_NOTICE)?;
                } else {
                    info!("change backend exhausted, stopping watch loop");
                }
                Ok(WatchReport {
                    exit,
                    built,
                    failed,
                    released,
                })
            }
            Err(err) => {
                error!(error = %err, "watch loop failed");
                Err(err)
            }
        }
    }
}
