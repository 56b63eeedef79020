// src/build/output.rs

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::catalog::path_utils::normalize;
use crate::catalog::{FileSet, SourcePath};
use crate::errors::{Result, RewatchError};

/// Map a source path to its output path under `target_dir`.
///
/// With target `.` the output sits next to the source, only the extension
/// changes. Otherwise the input's relative layout is kept below the target
/// root: `a/b.src` with target `out` becomes `out/a/b.out`. In that case
/// root, prefix, `.` and `..` components are dropped so every output lands
/// inside `target_dir`; [`ensure_distinct_outputs`] rejects catalogs where
/// this makes two inputs share an output.
pub fn output_path_for(input: &Path, target_dir: &Path, target_ext: &str) -> PathBuf {
    if target_dir == Path::new(".") {
        let mut beside = normalize(input);
        beside.set_extension(target_ext);
        return beside;
    }

    let mut rel = PathBuf::new();
    for comp in input.components() {
        if let Component::Normal(part) = comp {
            rel.push(part);
        }
    }
    rel.set_extension(target_ext);
    target_dir.join(rel)
}

/// Fail when two catalogued files would be written to the same output path.
pub fn ensure_distinct_outputs(files: &FileSet, target_dir: &Path, target_ext: &str) -> Result<()> {
    let mut claimed: HashMap<PathBuf, &SourcePath> = HashMap::new();
    for path in files {
        let out = output_path_for(path.as_path(), target_dir, target_ext);
        if let Some(first) = claimed.get(&out) {
            return Err(RewatchError::ConfigError(format!(
                "{first} and {path} would both be written to {}",
                out.display()
            )));
        }
        claimed.insert(out, path);
    }
    Ok(())
}
