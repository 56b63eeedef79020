// src/watch/probe.rs

use notify::{Config, Event, RecommendedWatcher, Watcher};
use tracing::{debug, info};

/// Which change backend a watch session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Kernel-level notifications through the platform's `notify` backend.
    Native,
    /// Periodic modification-time sweeps over the catalogued files.
    Polling,
}

/// One-time capability check, done at watch-session start.
///
/// Tries to create the platform watcher; if that fails the session falls back
/// to polling. Unavailability is not an error.
pub fn probe() -> BackendKind {
    match RecommendedWatcher::new(|_res: notify::Result<Event>| {}, Config::default()) {
        Ok(watcher) => {
            drop(watcher);
            debug!("native change notification available");
            BackendKind::Native
        }
        Err(err) => {
            info!(error = %err, "native change notification unavailable; using polling");
            BackendKind::Polling
        }
    }
}
