//! Collecting font paths from user input.
//!
//! Inputs may be files or directories; directories are searched recursively.
//! Intake never touches the file system beyond listing and stat calls.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{GlobResult, Pattern, glob};
use log::warn;

/// Result of scanning user-supplied paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Intake {
    /// Files with an accepted extension, in input order; directory contents sorted.
    pub accepted: Vec<PathBuf>,
    /// Files skipped for their extension.
    pub rejected: Vec<PathBuf>,
}

/// Returns whether `path` ends in one of `extensions`, ignoring case.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Sort `inputs` into accepted and rejected files, expanding directories.
pub fn scan<P: AsRef<Path>>(inputs: impl IntoIterator<Item = P>, extensions: &[&str]) -> Result<Intake> {
    let mut intake = Intake::default();
    for input in inputs {
        let input = input.as_ref();
        let files = if input.is_dir() { files_under(input)? } else { vec![input.to_path_buf()] };
        for file in files {
            if has_extension(&file, extensions) {
                intake.accepted.push(file);
            } else {
                intake.rejected.push(file);
            }
        }
    }
    Ok(intake)
}

/// Every regular file below `dir`, sorted.
fn files_under(dir: &Path) -> Result<Vec<PathBuf>> {
    let root = dir.to_str().with_context(|| format!("non UTF-8 path: {}", dir.display()))?;
    let pattern = format!("{}/**/*", Pattern::escape(root));
    let mut files: Vec<PathBuf> = glob(&pattern)
        .with_context(|| format!("failed to search {}", dir.display()))?
        .filter_map(listed)
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// The matched path, or `None` with a warning when it could not be listed.
fn listed(entry: GlobResult) -> Option<PathBuf> {
    match entry {
        Ok(path) => Some(path),
        Err(err) => {
            warn!("skipping {}: {}", err.path().display(), err.error());
            None
        }
    }
}
