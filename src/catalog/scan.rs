// src/catalog/scan.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::path_utils::{has_extension, is_hidden};
use crate::catalog::{FileSet, SourcePath};
use crate::errors::{Result, RewatchError};
use crate::fs::FileSystem;

/// Build the catalog for the given roots, in the order they were supplied.
///
/// - A directory root is expanded recursively. Entries whose name starts with
///   `.` are skipped, and hidden directories are never descended into. Only
///   files ending in `.<source_ext>` are kept.
/// - Anything else is taken as an explicit file and kept as-is, without
///   extension filtering. A hidden explicit file is a configuration error.
///
/// Entries within a directory are visited in name order, so the result is
/// deterministic. A directory reached a second time (through a symlink) is
/// not expanded again. Any unreadable directory aborts the scan.
pub fn scan_roots(fs: &dyn FileSystem, roots: &[PathBuf], source_ext: &str) -> Result<FileSet> {
    let mut set = FileSet::new();
    let mut visited = HashSet::new();

    for root in roots {
        if fs.is_dir(root) {
            scan_dir(fs, root, source_ext, &mut set, &mut visited)?;
        } else if is_hidden(root) {
            return Err(RewatchError::ConfigError(format!(
                "{} is a hidden file and cannot be compiled",
                root.display()
            )));
        } else {
            debug!(path = %root.display(), "adding explicit file root");
            set.insert(SourcePath::new(root));
        }
    }

    debug!(files = set.len(), "catalog complete");
    Ok(set)
}

fn scan_dir(
    fs: &dyn FileSystem,
    dir: &Path,
    source_ext: &str,
    set: &mut FileSet,
    visited: &mut HashSet<PathBuf>,
) -> Result<()> {
    let identity = fs.canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    if !visited.insert(identity) {
        debug!(dir = %dir.display(), "directory already scanned; skipping");
        return Ok(());
    }

    let mut entries = fs.read_dir(dir).map_err(|source| RewatchError::Scan {
        path: dir.to_path_buf(),
        source,
    })?;
    entries.sort();

    for entry in entries {
        if is_hidden(&entry) {
            continue;
        }
        if fs.is_dir(&entry) {
            scan_dir(fs, &entry, source_ext, set, visited)?;
        } else if has_extension(&entry, source_ext) {
            set.insert(SourcePath::new(&entry));
        }
    }

    Ok(())
}
