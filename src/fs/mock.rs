use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { content: Vec<u8>, modified: SystemTime },
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    unreadable: HashSet<PathBuf>,
    read_only: HashSet<PathBuf>,
}

/// In-memory filesystem for tests.
///
/// Paths are keyed after dropping `.` components, so `./src/a.src` and
/// `src/a.src` refer to the same entry. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

fn key(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        if comp != Component::CurDir {
            out.push(comp);
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

fn parent_key(path: &Path) -> Option<PathBuf> {
    let parent = path.parent()?;
    Some(key(parent))
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        // Ensure root exists
        fs.lock()
            .entries
            .insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));
        fs
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Add (or replace) a file. A new file gets the epoch as its modification
    /// time; replacing a file keeps its previous time.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = key(path.as_ref());
        let mut state = self.lock();
        let modified = match state.entries.get(&path) {
            Some(MockEntry::File { modified, .. }) => *modified,
            _ => UNIX_EPOCH,
        };
        state.entries.insert(
            path.clone(),
            MockEntry::File {
                content: content.into(),
                modified,
            },
        );
        Self::link_into_parent(&mut state, &path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = key(path.as_ref());
        let mut state = self.lock();
        Self::ensure_dir_entry(&mut state, &path);
    }

    /// Set the modification time of an existing file to `secs` after the epoch.
    pub fn set_modified(&self, path: impl AsRef<Path>, secs: u64) {
        let path = key(path.as_ref());
        let mut state = self.lock();
        if let Some(MockEntry::File { modified, .. }) = state.entries.get_mut(&path) {
            *modified = UNIX_EPOCH + Duration::from_secs(secs);
        }
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let path = key(path.as_ref());
        let mut state = self.lock();
        state.entries.remove(&path);
        if let (Some(parent), Some(name)) = (parent_key(&path), path.file_name()) {
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(&parent) {
                children.retain(|c| c.as_str() != name.to_string_lossy());
            }
        }
    }

    /// Make `read_dir` fail for this directory.
    pub fn deny_read_dir(&self, path: impl AsRef<Path>) {
        self.lock().unreadable.insert(key(path.as_ref()));
    }

    /// Make writes (and directory creation) fail at or below this path.
    pub fn deny_write(&self, path: impl AsRef<Path>) {
        self.lock().read_only.insert(key(path.as_ref()));
    }

    pub fn file_contents(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.lock().entries.get(&key(path.as_ref())) {
            Some(MockEntry::File { content, .. }) => {
                Some(String::from_utf8_lossy(content).into_owned())
            }
            _ => None,
        }
    }

    fn is_read_only(state: &MockState, path: &Path) -> bool {
        state.read_only.iter().any(|ro| path.starts_with(ro))
    }

    fn link_into_parent(state: &mut MockState, path: &Path) {
        let Some(parent) = parent_key(path) else {
            return;
        };
        if parent == path {
            return;
        }
        Self::ensure_dir_entry(state, &parent);
        if let Some(MockEntry::Dir(children)) = state.entries.get_mut(&parent) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    fn ensure_dir_entry(state: &mut MockState, path: &Path) {
        if !state.entries.contains_key(path) {
            state
                .entries
                .insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
            Self::link_into_parent(state, path);
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.lock();
        match state.entries.get(&key(path)) {
            Some(MockEntry::File { content, .. }) => String::from_utf8(content.clone())
                .map_err(|e| anyhow!("Invalid UTF-8: {}", e)),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        {
            let state = self.lock();
            if Self::is_read_only(&state, &key(path)) {
                return Err(anyhow!("Permission denied: {:?}", path));
            }
            if let Some(MockEntry::Dir(_)) = state.entries.get(&key(path)) {
                return Err(anyhow!("Is a directory: {:?}", path));
            }
        }
        self.add_file(path, contents);
        let mut state = self.lock();
        if let Some(MockEntry::File { modified, .. }) = state.entries.get_mut(&key(path)) {
            *modified = SystemTime::now();
        }
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let path = key(path);
        let mut state = self.lock();
        if Self::is_read_only(&state, &path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        if let Some(MockEntry::File { .. }) = state.entries.get(&path) {
            return Err(anyhow!("File exists: {:?}", path));
        }
        Self::ensure_dir_entry(&mut state, &path);
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(&key(path)), Some(MockEntry::Dir(_)))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // In mock, we just return the path as is, assuming absolute paths are used in tests
        Ok(path.to_path_buf())
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        match self.lock().entries.get(&key(path)) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.lock();
        let k = key(path);
        if state.unreadable.contains(&k) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        match state.entries.get(&k) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
