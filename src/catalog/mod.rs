// src/catalog/mod.rs

//! Source discovery.
//!
//! Turns the roots given on the command line into an ordered, de-duplicated
//! [`FileSet`], and derives from it the set of directories a watch session
//! has to observe.

pub mod path_utils;
pub mod scan;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

pub use scan::scan_roots;

use path_utils::{normalize, parent_dir};

/// A normalized path to a compilable source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourcePath(PathBuf);

impl SourcePath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(normalize(path.as_ref()))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for SourcePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Ordered set of unique source paths; insertion order is discovery order.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    paths: Vec<SourcePath>,
    seen: HashSet<SourcePath>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path; returns `false` (and keeps the first occurrence) when it
    /// is already present.
    pub fn insert(&mut self, path: SourcePath) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.paths.push(path);
        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourcePath> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Parent directories of every path, de-duplicated in first-seen order.
    pub fn watch_targets(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut dirs = Vec::new();
        for path in &self.paths {
            let dir = normalize(&parent_dir(path.as_path()));
            if seen.insert(dir.clone()) {
                dirs.push(dir);
            }
        }
        dirs
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a SourcePath;
    type IntoIter = std::slice::Iter<'a, SourcePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

impl FromIterator<SourcePath> for FileSet {
    fn from_iter<I: IntoIterator<Item = SourcePath>>(iter: I) -> Self {
        let mut set = FileSet::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}
