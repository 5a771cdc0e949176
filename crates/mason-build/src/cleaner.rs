//! Transient build-tree removal
//!
//! Best-effort cleanup of the intermediate directories the external compiler
//! leaves behind. Runs on every exit path; a directory that cannot be
//! removed is reported and left for the next run.

use crate::output::OutputMode;
use std::fs;
use std::path::{Path, PathBuf};

/// Remove each named scratch directory under the project root. Returns the
/// paths that could not be removed.
pub fn clean_scratch_dirs(root: &Path, dirs: &[PathBuf], output: OutputMode) -> Vec<PathBuf> {
    let mut leftover = Vec::new();

    for dir in dirs {
        let path = root.join(dir);
        if !path.exists() {
            continue;
        }
        match fs::remove_dir_all(&path) {
            Ok(()) => {
                if output.is_verbose() {
                    println!("  Removed {}", dir.display());
                }
            }
            Err(e) => {
                if !output.is_quiet() {
                    eprintln!("warning: could not remove {}: {}", path.display(), e);
                }
                leftover.push(path);
            }
        }
    }

    leftover
}
