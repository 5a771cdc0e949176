//! Persistent path -> content-hash records
//!
//! One addressable file per tracked source file, stored under the cache
//! directory. Writes go straight to disk so a crash mid-run loses at most the
//! in-flight entry.

use crate::error::{BuildError, BuildResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Write-through store of per-file content hashes
#[derive(Debug)]
pub struct HashStore {
    root: PathBuf,
}

impl HashStore {
    /// Open a store rooted at the given cache directory. The directory is
    /// created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache directory backing this store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load all persisted entries. A missing cache directory is an empty
    /// store, not an error. Individually unreadable entries are skipped.
    pub fn load(&self) -> BuildResult<HashMap<String, String>> {
        let mut entries = HashMap::new();

        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(BuildError::io(&self.root, e)),
        };

        for entry in dir.filter_map(|e| e.ok()) {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Ok(hash) = fs::read_to_string(entry.path()) {
                entries.insert(unescape_key(&name), hash.trim().to_string());
            }
        }

        Ok(entries)
    }

    /// Look up one entry
    pub fn get(&self, path: &str) -> Option<String> {
        let file = self.root.join(escape_key(path));
        fs::read_to_string(file).ok().map(|s| s.trim().to_string())
    }

    /// Write one entry through to disk, overwriting any previous hash
    pub fn save(&self, path: &str, hash: &str) -> BuildResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| BuildError::io(&self.root, e))?;
        let file = self.root.join(escape_key(path));
        fs::write(&file, hash).map_err(|e| BuildError::io(&file, e))?;
        Ok(())
    }

    /// Remove every persisted entry (used by clean mode)
    pub fn clear(&self) -> BuildResult<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BuildError::io(&self.root, e)),
        }
    }
}

/// Escape a tracked path into a flat, collision-free file name. A literal
/// underscore is escaped first so that `a/b` and `a__b` never share a record;
/// separators then become `__` and a Windows drive colon becomes `_d`.
fn escape_key(path: &str) -> String {
    let mut name = String::with_capacity(path.len() + 4);
    for c in path.chars() {
        match c {
            '_' => name.push_str("_u"),
            ':' => name.push_str("_d"),
            '/' | '\\' => name.push_str("__"),
            c => name.push(c),
        }
    }
    name
}

/// Exact inverse of [`escape_key`]
fn unescape_key(name: &str) -> String {
    let mut path = String::with_capacity(name.len());
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        if c != '_' {
            path.push(c);
            continue;
        }
        match chars.next() {
            Some('_') => path.push('/'),
            Some('u') => path.push('_'),
            Some('d') => path.push(':'),
            // Not produced by escape_key; keep the bytes as written
            Some(other) => {
                path.push('_');
                path.push(other);
            }
            None => path.push('_'),
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn load_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = HashStore::new(temp.path().join("hashes"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_get() {
        let temp = TempDir::new().unwrap();
        let store = HashStore::new(temp.path().join("hashes"));

        store.save("src/main.src", "abc123").unwrap();
        assert_eq!(store.get("src/main.src"), Some("abc123".to_string()));
        assert_eq!(store.get("src/other.src"), None);
    }

    #[test]
    fn save_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = HashStore::new(temp.path().join("hashes"));

        store.save("a.src", "one").unwrap();
        store.save("a.src", "two").unwrap();
        assert_eq!(store.get("a.src"), Some("two".to_string()));
    }

    #[test]
    fn save_is_durable_on_disk() {
        let temp = TempDir::new().unwrap();
        let store = HashStore::new(temp.path().join("hashes"));
        store.save("src/main.src", "abc123").unwrap();

        // A fresh store over the same directory sees the entry, as a process
        // restarted after a crash would.
        let reopened = HashStore::new(temp.path().join("hashes"));
        let entries = reopened.load().unwrap();
        assert_eq!(entries.get("src/main.src"), Some(&"abc123".to_string()));
    }

    #[test]
    fn escape_is_collision_free_for_separators() {
        assert_eq!(escape_key("a/b/c.src"), "a__b__c.src");
        assert_eq!(escape_key("a\\b.src"), "a__b.src");
        assert_ne!(escape_key("a/b.src"), escape_key("ab.src"));
    }

    #[test]
    fn escape_is_collision_free_for_underscores() {
        // A literal __ in a file name must not alias a path separator
        assert_ne!(escape_key("a/b.src"), escape_key("a__b.src"));
        assert_ne!(escape_key("a_b.src"), escape_key("a_u_b.src"));
    }

    #[test]
    fn unescape_inverts_escape() {
        for path in ["src/main.src", "a__b.src", "a_b/c_d.src", "C:/work/x.src"] {
            assert_eq!(unescape_key(&escape_key(path)), path);
        }
    }

    #[test]
    fn underscore_names_keep_separate_records() {
        let temp = TempDir::new().unwrap();
        let store = HashStore::new(temp.path().join("hashes"));

        store.save("a/b.src", "slash").unwrap();
        assert_eq!(store.get("a__b.src"), None);

        store.save("a__b.src", "underscore").unwrap();
        assert_eq!(store.get("a/b.src"), Some("slash".to_string()));
        assert_eq!(store.get("a__b.src"), Some("underscore".to_string()));

        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get("a/b.src"), Some(&"slash".to_string()));
        assert_eq!(entries.get("a__b.src"), Some(&"underscore".to_string()));
    }

    #[test]
    fn clear_removes_everything() {
        let temp = TempDir::new().unwrap();
        let store = HashStore::new(temp.path().join("hashes"));
        store.save("a.src", "one").unwrap();
        store.save("b.src", "two").unwrap();

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
        // Clearing an already-clean store is fine
        store.clear().unwrap();
    }
}
