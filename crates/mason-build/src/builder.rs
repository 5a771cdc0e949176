//! Build orchestration
//!
//! Wires the run together: hash store load, change scan, rebuild planning,
//! sequential target execution, and unconditional scratch cleanup.

use crate::cleaner::clean_scratch_dirs;
use crate::detector::ChangeDetector;
use crate::error::{BuildError, BuildResult};
use crate::executor::Executor;
use crate::hash_store::HashStore;
use crate::output::{BuildSummary, OutputMode};
use crate::planner::RebuildPlanner;
use crate::profile::BuildConfig;
use crate::targets::{TargetOutcome, TargetSpec};
use mason_config::Manifest;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of one orchestrated run
#[derive(Debug)]
pub struct RunReport {
    /// Per-target outcomes, in declaration order, up to the abort point
    pub outcomes: Vec<TargetOutcome>,
    /// Whether the run stopped before reaching every target
    pub aborted: bool,
    /// End-of-run summary covering every declared target
    pub summary: BuildSummary,
}

impl RunReport {
    /// True when every attempted target succeeded and nothing was cut off
    pub fn success(&self) -> bool {
        self.summary.success()
    }
}

/// Main orchestrator for a project's build runs
pub struct Builder {
    /// Project root directory
    root: PathBuf,
    /// Project manifest
    manifest: Manifest,
    /// Output verbosity
    output: OutputMode,
    /// Force every target dirty (full-rebuild modes)
    force: bool,
}

impl Builder {
    /// Create a builder for the project at the given path, loading its
    /// `mason.toml`.
    pub fn new(project_path: impl AsRef<Path>) -> BuildResult<Self> {
        let root = project_path.as_ref().to_path_buf();
        let manifest_path = root.join("mason.toml");
        let manifest = Manifest::load_from_file(&manifest_path)
            .map_err(|e| BuildError::manifest_read(&manifest_path, e))?;

        Ok(Self {
            root,
            manifest,
            output: OutputMode::Normal,
            force: false,
        })
    }

    /// Set output mode
    pub fn with_output_mode(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Force every target dirty this run
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Project manifest
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Target specs in declaration order, validated
    pub fn specs(&self) -> BuildResult<Vec<TargetSpec>> {
        let specs: Vec<TargetSpec> = self.manifest.targets.iter().map(TargetSpec::from).collect();
        for spec in &specs {
            spec.validate().map_err(BuildError::InvalidTarget)?;
        }
        Ok(specs)
    }

    /// Execute one run with an already-resolved configuration.
    ///
    /// Scratch cleanup runs on every exit path, including fatal errors, so
    /// partial build trees never accumulate across runs. The per-target
    /// summary is printed even for aborted runs.
    pub fn execute(&self, config: &BuildConfig) -> BuildResult<RunReport> {
        let result = self.execute_inner(config);
        clean_scratch_dirs(&self.root, &self.manifest.cache.scratch_dirs, self.output);
        let report = result?;
        report.summary.print(self.output);
        Ok(report)
    }

    fn execute_inner(&self, config: &BuildConfig) -> BuildResult<RunReport> {
        let specs = self.specs()?;

        if self.output.is_verbose() {
            println!(
                "Building {} ({} targets, {} toolchain)",
                self.manifest.name(),
                specs.len(),
                config.toolchain.toolchain
            );
        }

        let store = HashStore::new(self.root.join(&self.manifest.cache.dir));
        let planner = RebuildPlanner::new(&self.root);
        let detector = ChangeDetector::new(&store, &self.root);

        // One detector pass over every declared file, store updated
        // write-through as it goes
        let tracked = planner.all_member_files(&specs)?;
        let changes = detector.scan(&tracked)?;

        let states = planner.plan(&specs, &changes, self.force)?;

        let executor = Executor::new(&self.root, config, self.output);
        let (outcomes, aborted) = executor.run_all(&states);

        let names: Vec<String> = specs.iter().map(|s| s.name.clone()).collect();
        let summary = BuildSummary::new(&names, &outcomes, aborted, config.toolchain.degraded);

        Ok(RunReport {
            outcomes,
            aborted,
            summary,
        })
    }

    /// Remove build artifacts, scratch directories, and the hash cache
    pub fn clean(&self) -> BuildResult<()> {
        for target in &self.manifest.targets {
            let artifact = self.root.join(&target.artifact);
            match fs::remove_file(&artifact) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(BuildError::io(&artifact, e)),
            }
        }

        clean_scratch_dirs(&self.root, &self.manifest.cache.scratch_dirs, self.output);

        HashStore::new(self.root.join(&self.manifest.cache.dir)).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_manifest(root: &Path) {
        let manifest = r#"
[package]
name = "demo"
version = "1.0.0"

[[target]]
name = "app"
patterns = ["app.src"]
entry = "app.src"
artifact = "dist/app.bin"
"#;
        fs::write(root.join("mason.toml"), manifest).unwrap();
    }

    #[test]
    fn new_loads_manifest() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path());

        let builder = Builder::new(temp.path()).unwrap();
        assert_eq!(builder.manifest().name(), "demo");
        assert_eq!(builder.specs().unwrap().len(), 1);
    }

    #[test]
    fn new_fails_without_manifest() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Builder::new(temp.path()),
            Err(BuildError::ManifestReadError { .. })
        ));
    }

    #[test]
    fn clean_removes_artifacts_and_cache() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path());
        fs::create_dir_all(temp.path().join("dist")).unwrap();
        fs::write(temp.path().join("dist/app.bin"), "bin").unwrap();
        fs::create_dir_all(temp.path().join("build")).unwrap();
        fs::create_dir_all(temp.path().join(".mason/hashes")).unwrap();
        fs::write(temp.path().join(".mason/hashes/app.src"), "hash").unwrap();

        let builder = Builder::new(temp.path())
            .unwrap()
            .with_output_mode(OutputMode::Quiet);
        builder.clean().unwrap();

        assert!(!temp.path().join("dist/app.bin").exists());
        assert!(!temp.path().join("build").exists());
        assert!(!temp.path().join(".mason/hashes").exists());
    }
}
