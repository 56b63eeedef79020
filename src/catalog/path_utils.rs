// src/catalog/path_utils.rs

//! Utility functions for path handling shared by the catalog and watchers.

use std::path::{Component, Path, PathBuf};

/// Marker that makes a directory entry hidden.
pub const HIDDEN_MARKER: char = '.';

/// Lexically normalize a path: drop `.` components, keep everything else.
///
/// `./src/./a.src` and `src/a.src` normalize to the same value; a path made
/// only of `.` components becomes `.`. No filesystem access happens here, so
/// `..` is preserved as written.
pub fn normalize(path: &Path) -> PathBuf {
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

/// True when the final component starts with the hidden-file marker.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(HIDDEN_MARKER))
}

/// True when `path` ends with `.<ext>` (case-sensitive, `ext` without dot).
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

/// Directory that contains `path`, with `.` standing in for "no parent".
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
