//! Target rebuild planning
//!
//! Expands each target's file patterns into its member set and aggregates
//! per-file change signals into a single dirty/clean decision per target.

use crate::error::{BuildError, BuildResult};
use crate::targets::{DirtyReason, TargetSpec, TargetState};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Plans which targets need rebuilding this run
#[derive(Debug)]
pub struct RebuildPlanner {
    /// Project root; patterns and artifact paths resolve against it
    root: PathBuf,
}

impl RebuildPlanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Expand a target's glob patterns into its member file set, in pattern
    /// order. A pattern matching zero files is fine (optional module
    /// directories); a malformed pattern is a configuration error.
    pub fn member_files(&self, spec: &TargetSpec) -> BuildResult<Vec<PathBuf>> {
        let mut members = Vec::new();
        let mut seen = HashSet::new();

        for pattern in &spec.patterns {
            let absolute = self.root.join(pattern);
            let matches = glob::glob(&absolute.to_string_lossy()).map_err(|e| {
                BuildError::InvalidPattern {
                    pattern: pattern.clone(),
                    error: e.to_string(),
                }
            })?;

            for path in matches.filter_map(|m| m.ok()) {
                if path.is_file() && seen.insert(path.clone()) {
                    members.push(path);
                }
            }
        }

        Ok(members)
    }

    /// Decide dirty/clean for every target.
    ///
    /// dirty = (member set intersects the changed set) OR (artifact missing),
    /// plus `Forced` when a full rebuild was requested. Targets stay
    /// independent: one target's dirtiness never propagates to another, and a
    /// file matched by several targets marks all of them dirty.
    pub fn plan(
        &self,
        specs: &[TargetSpec],
        changes: &HashSet<PathBuf>,
        force: bool,
    ) -> BuildResult<Vec<TargetState>> {
        let mut states = Vec::with_capacity(specs.len());

        for spec in specs {
            let mut reasons = Vec::new();

            if force {
                reasons.push(DirtyReason::Forced);
            }

            for member in self.member_files(spec)? {
                if changes.contains(&member) {
                    reasons.push(DirtyReason::SourceChanged(self.relative(&member)));
                }
            }

            if !self.root.join(&spec.artifact).exists() {
                reasons.push(DirtyReason::ArtifactMissing);
            }

            states.push(if reasons.is_empty() {
                TargetState::clean(spec.clone())
            } else {
                TargetState::dirty(spec.clone(), reasons)
            });
        }

        Ok(states)
    }

    /// Every member file across all targets, deduplicated, for the detector
    /// scan pass.
    pub fn all_member_files(&self, specs: &[TargetSpec]) -> BuildResult<Vec<PathBuf>> {
        let mut all = Vec::new();
        let mut seen = HashSet::new();
        for spec in specs {
            for member in self.member_files(spec)? {
                if seen.insert(member.clone()) {
                    all.push(member);
                }
            }
        }
        Ok(all)
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }
}
