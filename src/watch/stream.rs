// src/watch/stream.rs

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::path_utils::{has_extension, is_hidden};
use crate::catalog::{FileSet, SourcePath};
use crate::config::Settings;
use crate::fs::FileSystem;
use crate::watch::native::NativeNotifier;
use crate::watch::polling::PollingNotifier;
use crate::watch::probe::BackendKind;

/// The backend chosen for a session.
#[derive(Debug)]
pub enum ChangeBackend {
    Native(NativeNotifier),
    Polling(PollingNotifier),
}

impl ChangeBackend {
    /// Set up the backend for `files`.
    ///
    /// If native registration fails outright the session starts on polling
    /// instead; this happens once, before any event is pulled.
    pub fn open(
        kind: BackendKind,
        files: &FileSet,
        settings: &Settings,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        match kind {
            BackendKind::Native => match NativeNotifier::open(&files.watch_targets(), fs.clone()) {
                Ok(native) => ChangeBackend::Native(native),
                Err(err) => {
                    warn!(error = %err, "native watcher setup failed; falling back to polling");
                    ChangeBackend::Polling(PollingNotifier::new(files, fs, settings.poll_interval))
                }
            },
            BackendKind::Polling => {
                ChangeBackend::Polling(PollingNotifier::new(files, fs, settings.poll_interval))
            }
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            ChangeBackend::Native(_) => BackendKind::Native,
            ChangeBackend::Polling(_) => BackendKind::Polling,
        }
    }
}

/// Lazy, pull-based sequence of changed source files.
///
/// Each call to [`EventStream::next`] returns the next changed path, waiting
/// in the backend's suspension point (native read or polling sleep) until one
/// is available. Not restartable: a new session builds a new stream.
#[derive(Debug)]
pub struct EventStream {
    backend: ChangeBackend,
    pending: VecDeque<SourcePath>,
    source_ext: String,
    exhausted: bool,
}

impl EventStream {
    pub fn new(backend: ChangeBackend, source_ext: impl Into<String>) -> Self {
        Self {
            backend,
            pending: VecDeque::new(),
            source_ext: source_ext.into(),
            exhausted: false,
        }
    }

    /// Probe-selected backend over `files`, filtered to `settings.source_ext`.
    pub fn open(
        kind: BackendKind,
        files: &FileSet,
        settings: &Settings,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let backend = ChangeBackend::open(kind, files, settings, fs);
        debug!(backend = ?backend.kind(), "event stream opened");
        Self::new(backend, settings.source_ext.clone())
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Next changed file; `None` once the backend is exhausted.
    ///
    /// Dropping the returned future while it waits loses nothing already
    /// queued.
    pub async fn next(&mut self) -> Option<SourcePath> {
        loop {
            if let Some(path) = self.pending.pop_front() {
                return Some(path);
            }
            if self.exhausted {
                return None;
            }

            match &mut self.backend {
                ChangeBackend::Native(native) => match native.read().await {
                    Some(pairs) => {
                        for path in native.translate(pairs) {
                            if accepts(&path, &self.source_ext) {
                                self.pending.push_back(SourcePath::new(path));
                            }
                        }
                    }
                    None => self.exhausted = true,
                },
                ChangeBackend::Polling(poller) => {
                    for path in poller.next_batch().await {
                        if accepts(path.as_path(), &self.source_ext) {
                            self.pending.push_back(path);
                        }
                    }
                }
            }
        }
    }

    /// End the session, releasing any watch registrations.
    ///
    /// Returns the number of released registrations (always 0 for polling).
    pub fn close(mut self) -> usize {
        self.pending.clear();
        match &mut self.backend {
            ChangeBackend::Native(native) => native.release(),
            ChangeBackend::Polling(_) => 0,
        }
    }
}

fn accepts(path: &Path, source_ext: &str) -> bool {
    has_extension(path, source_ext) && !is_hidden(path)
}
