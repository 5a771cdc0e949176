//! Content-hash change detection against the persistent hash store

use crate::error::BuildResult;
use crate::hash_store::HashStore;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of checking one file against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    /// No prior entry for this path
    New,
    /// Prior hash exists and differs
    Changed,
    /// Prior hash exists and matches
    Unchanged,
}

impl FileChange {
    /// Whether this result should mark the owning target dirty
    pub fn is_dirty(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Detects content changes by comparing current file hashes against the store
#[derive(Debug)]
pub struct ChangeDetector<'a> {
    store: &'a HashStore,
    /// Project root used to relativize tracked paths into store keys
    root: PathBuf,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(store: &'a HashStore, root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            root: root.into(),
        }
    }

    /// Check one file and update the store.
    ///
    /// An unreadable file (missing, permission denied) is reported as
    /// `Changed` without touching the store: a false rebuild is cheap, a
    /// silently skipped one is not.
    pub fn check(&self, path: &Path) -> BuildResult<FileChange> {
        let key = self.store_key(path);

        let current = match hash_file(path) {
            Ok(hash) => hash,
            Err(_) => return Ok(FileChange::Changed),
        };

        match self.store.get(&key) {
            None => {
                self.store.save(&key, &current)?;
                Ok(FileChange::New)
            }
            Some(previous) if previous != current => {
                self.store.save(&key, &current)?;
                Ok(FileChange::Changed)
            }
            Some(_) => Ok(FileChange::Unchanged),
        }
    }

    /// Check every file in the list and return the changed/new subset
    pub fn scan(&self, files: &[PathBuf]) -> BuildResult<HashSet<PathBuf>> {
        let mut changed = HashSet::new();
        for path in files {
            if self.check(path)?.is_dirty() {
                changed.insert(path.clone());
            }
        }
        Ok(changed)
    }

    /// Store key for a file: project-relative, forward slashes
    fn store_key(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Compute the SHA-256 hex digest of a file's raw bytes
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let content = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}
