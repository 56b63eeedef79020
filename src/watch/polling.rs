// src/watch/polling.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::{debug, trace};

use crate::catalog::{FileSet, SourcePath};
use crate::fs::FileSystem;

/// Last observed modification time per file.
#[derive(Debug, Default)]
pub struct ModificationClock {
    times: HashMap<SourcePath, SystemTime>,
}

impl ModificationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation; returns true if it counts as a change.
    ///
    /// The first observation of a path only seeds the clock. Later ones report
    /// a change (and advance the clock) only when strictly newer.
    pub fn observe(&mut self, path: &SourcePath, mtime: SystemTime) -> bool {
        match self.times.get_mut(path) {
            None => {
                self.times.insert(path.clone(), mtime);
                false
            }
            Some(last) if mtime > *last => {
                *last = mtime;
                true
            }
            Some(_) => false,
        }
    }

    pub fn last_seen(&self, path: &SourcePath) -> Option<SystemTime> {
        self.times.get(path).copied()
    }
}

/// Portable backend: re-stat every catalogued file once per interval.
#[derive(Debug)]
pub struct PollingNotifier {
    files: Vec<SourcePath>,
    fs: Arc<dyn FileSystem>,
    clock: ModificationClock,
    interval: Duration,
    swept: bool,
}

impl PollingNotifier {
    pub fn new(files: &FileSet, fs: Arc<dyn FileSystem>, interval: Duration) -> Self {
        Self {
            files: files.iter().cloned().collect(),
            fs,
            clock: ModificationClock::new(),
            interval,
            swept: false,
        }
    }

    /// One pass over all files, in catalog order. Returns the changed ones.
    ///
    /// Files that cannot be stat'ed (e.g. deleted) are skipped for this sweep.
    pub fn sweep(&mut self) -> Vec<SourcePath> {
        let mut changed = Vec::new();
        for path in &self.files {
            match self.fs.modified(path.as_path()) {
                Ok(mtime) => {
                    if self.clock.observe(path, mtime) {
                        debug!(path = %path, "modification detected");
                        changed.push(path.clone());
                    }
                }
                Err(err) => trace!(path = %path, error = %err, "cannot stat watched file"),
            }
        }
        changed
    }

    /// Sweep until something changed, sleeping one interval between sweeps.
    ///
    /// The very first sweep runs immediately (and only seeds the clock).
    /// Never returns an empty batch; the polling backend never runs dry.
    pub async fn next_batch(&mut self) -> Vec<SourcePath> {
        loop {
            if self.swept {
                tokio::time::sleep(self.interval).await;
            }
            self.swept = true;

            let changed = self.sweep();
            if !changed.is_empty() {
                return changed;
            }
        }
    }
}
