// src/watch/native.rs

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::fs::FileSystem;

/// Identifier of one registered directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchHandle(u64);

#[derive(Debug)]
struct Registration {
    /// Directory as spelled in the catalog; used to rebuild event paths.
    dir: PathBuf,
    /// Canonical form handed to the OS watcher.
    watched: PathBuf,
}

/// Kernel-notification backend: one non-recursive watch per directory,
/// reporting files that were closed after being written.
pub struct NativeNotifier {
    watcher: Option<RecommendedWatcher>,
    registrations: HashMap<WatchHandle, Registration>,
    by_watched: HashMap<PathBuf, WatchHandle>,
    events_rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl std::fmt::Debug for NativeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeNotifier")
            .field("registrations", &self.registrations.len())
            .finish_non_exhaustive()
    }
}

impl NativeNotifier {
    /// Register every directory in `dirs`.
    ///
    /// Directories that cannot be resolved or registered are skipped with a
    /// warning; failing to create the watcher itself is an error.
    pub fn open(dirs: &[PathBuf], fs: Arc<dyn FileSystem>) -> Result<Self> {
        // Channel from the blocking notify callback into the async world.
        let (event_tx, events_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

        // Closure called synchronously by notify whenever an event arrives.
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                // The receiver is gone once the session ended; nothing to do.
                let _ = event_tx.send(res);
            },
            Config::default(),
        )?;

        let mut registrations = HashMap::new();
        let mut by_watched = HashMap::new();
        let mut next_id = 0u64;

        for dir in dirs {
            let watched = match fs.canonicalize(dir) {
                Ok(p) => p,
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "cannot resolve directory; not watching it");
                    continue;
                }
            };
            if by_watched.contains_key(&watched) {
                continue;
            }
            if let Err(err) = watcher.watch(&watched, RecursiveMode::NonRecursive) {
                warn!(dir = %dir.display(), error = %err, "cannot watch directory");
                continue;
            }

            let handle = WatchHandle(next_id);
            next_id += 1;
            debug!(dir = %dir.display(), ?handle, "registered watch");
            by_watched.insert(watched.clone(), handle);
            registrations.insert(
                handle,
                Registration {
                    dir: dir.clone(),
                    watched,
                },
            );
        }

        info!(directories = registrations.len(), "native file watcher started");

        Ok(Self {
            watcher: Some(watcher),
            registrations,
            by_watched,
            events_rx,
        })
    }

    /// Wait for the next batch of write-completed files.
    ///
    /// Returns `(handle, file name)` pairs; `None` once the backend has shut
    /// down. Batches with no relevant entries are skipped, so this only
    /// returns when there is something to report. Errors reported by the OS
    /// watcher are logged and skipped.
    pub async fn read(&mut self) -> Option<Vec<(WatchHandle, OsString)>> {
        loop {
            let Some(first) = self.events_rx.recv().await else {
                debug!("native watcher channel closed");
                return None;
            };

            let mut pairs = Vec::new();
            collect_pairs(&self.by_watched, first, &mut pairs);
            // Whatever else is already queued belongs to the same batch.
            while let Ok(res) = self.events_rx.try_recv() {
                collect_pairs(&self.by_watched, res, &mut pairs);
            }

            if !pairs.is_empty() {
                return Some(pairs);
            }
        }
    }

    /// Turn `(handle, file name)` pairs into paths spelled like the catalog.
    pub fn translate(&self, pairs: Vec<(WatchHandle, OsString)>) -> Vec<PathBuf> {
        pairs
            .into_iter()
            .filter_map(|(handle, name)| {
                self.registrations
                    .get(&handle)
                    .map(|reg| join_dir(&reg.dir, &name))
            })
            .collect()
    }

    /// Unregister every directory and stop the OS watcher.
    ///
    /// Returns how many registrations were released. Calling it again is a
    /// no-op.
    pub fn release(&mut self) -> usize {
        let Some(mut watcher) = self.watcher.take() else {
            return 0;
        };

        let mut released = 0;
        for (handle, reg) in self.registrations.drain() {
            if let Err(err) = watcher.unwatch(&reg.watched) {
                debug!(?handle, error = %err, "unwatch failed");
            }
            released += 1;
        }
        self.by_watched.clear();
        drop(watcher);

        info!(released, "native file watcher stopped");
        released
    }
}

impl Drop for NativeNotifier {
    fn drop(&mut self) {
        self.release();
    }
}

fn join_dir(dir: &Path, name: &OsString) -> PathBuf {
    if dir == Path::new(".") {
        PathBuf::from(name)
    } else {
        dir.join(name)
    }
}

/// Append the write-completed files of one notify result to `pairs`.
fn collect_pairs(
    by_watched: &HashMap<PathBuf, WatchHandle>,
    res: notify::Result<Event>,
    pairs: &mut Vec<(WatchHandle, OsString)>,
) {
    let event = match res {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "file watcher reported an error");
            return;
        }
    };
    debug!(?event, "received notify event");

    if !is_write_complete(&event.kind) {
        return;
    }

    for path in &event.paths {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            continue;
        };
        match by_watched.get(parent) {
            Some(handle) => pairs.push((*handle, name.to_os_string())),
            None => debug!(path = %path.display(), "event outside registered directories"),
        }
    }
}

/// True for events meaning "a file's new contents are complete".
fn is_write_complete(kind: &EventKind) -> bool {
    match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        // Editors that save via rename-into-place.
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => true,
        // Backends without close events report plain writes instead.
        #[cfg(not(target_os = "linux"))]
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_after_write_counts_as_change() {
        assert!(is_write_complete(&EventKind::Access(AccessKind::Close(
            AccessMode::Write
        ))));
        assert!(!is_write_complete(&EventKind::Access(AccessKind::Close(
            AccessMode::Read
        ))));
        assert!(!is_write_complete(&EventKind::Remove(notify::event::RemoveKind::File)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn plain_modify_is_ignored_where_close_events_exist() {
        use notify::event::{CreateKind, DataChange};

        assert!(!is_write_complete(&EventKind::Modify(ModifyKind::Data(
            DataChange::Content
        ))));
        assert!(!is_write_complete(&EventKind::Create(CreateKind::File)));
    }

    #[test]
    fn watcher_errors_do_not_drop_collected_pairs() {
        let handle = WatchHandle(0);
        let by_watched = HashMap::from([(PathBuf::from("/w"), handle)]);
        let write = Event::new(EventKind::Access(AccessKind::Close(AccessMode::Write)))
            .add_path(PathBuf::from("/w/a.src"));

        let mut pairs = Vec::new();
        collect_pairs(&by_watched, Ok(write), &mut pairs);
        collect_pairs(&by_watched, Err(notify::Error::generic("queue overflow")), &mut pairs);

        assert_eq!(pairs, vec![(handle, OsString::from("a.src"))]);
    }

    #[test]
    fn cwd_registration_yields_bare_names() {
        assert_eq!(join_dir(Path::new("."), &OsString::from("a.src")), PathBuf::from("a.src"));
        assert_eq!(join_dir(Path::new("src"), &OsString::from("a.src")), PathBuf::from("src/a.src"));
    }
}
