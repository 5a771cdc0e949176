/// Build target types and per-run target state
use mason_config::TargetConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A build target specification: a named source-file group, the flags it
/// contributes to the compiler, and its expected output artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Target name
    pub name: String,
    /// Glob patterns for member source files (relative to project root)
    pub patterns: Vec<String>,
    /// Entry source file handed to the compiler
    pub entry: PathBuf,
    /// Module inclusion flags
    pub modules: Vec<String>,
    /// Expected output artifact (relative to project root)
    pub artifact: PathBuf,
    /// A failed optional target does not abort the run
    pub optional: bool,
}

impl TargetSpec {
    /// Create a new target spec
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            patterns: Vec::new(),
            entry: PathBuf::new(),
            modules: Vec::new(),
            artifact: PathBuf::new(),
            optional: false,
        }
    }

    /// Set the source patterns
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Set the entry file
    pub fn with_entry(mut self, entry: impl Into<PathBuf>) -> Self {
        self.entry = entry.into();
        self
    }

    /// Set the module inclusion flags
    pub fn with_modules(mut self, modules: Vec<String>) -> Self {
        self.modules = modules;
        self
    }

    /// Set the expected output artifact
    pub fn with_artifact(mut self, artifact: impl Into<PathBuf>) -> Self {
        self.artifact = artifact.into();
        self
    }

    /// Mark the target optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Output file name derived from the artifact path
    pub fn output_filename(&self) -> String {
        self.artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }

    /// Directory the artifact is written into
    pub fn output_dir(&self) -> PathBuf {
        self.artifact
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
    }

    /// Validate the target configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Target name cannot be empty".to_string());
        }
        if self.patterns.is_empty() {
            return Err(format!("Target '{}' has no source patterns", self.name));
        }
        if self.artifact.as_os_str().is_empty() {
            return Err(format!("Target '{}' has no output artifact", self.name));
        }
        Ok(())
    }
}

impl From<&TargetConfig> for TargetSpec {
    fn from(config: &TargetConfig) -> Self {
        Self {
            name: config.name.clone(),
            patterns: config.patterns.clone(),
            entry: config.entry.clone(),
            modules: config.modules.clone(),
            artifact: config.artifact.clone(),
            optional: config.optional,
        }
    }
}

/// Why a target was marked dirty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirtyReason {
    /// A member source file is new or has changed content
    SourceChanged(PathBuf),
    /// The expected output artifact does not exist
    ArtifactMissing,
    /// A full-rebuild mode forced the target dirty
    Forced,
}

impl std::fmt::Display for DirtyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceChanged(path) => write!(f, "source changed: {}", path.display()),
            Self::ArtifactMissing => write!(f, "artifact missing"),
            Self::Forced => write!(f, "full rebuild requested"),
        }
    }
}

/// Per-run rebuild decision for one target. Built fresh by the planner each
/// invocation, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetState {
    /// The target this state describes
    pub spec: TargetSpec,
    /// Whether the target must be rebuilt this run
    pub dirty: bool,
    /// Why, when dirty (verbose reporting)
    pub reasons: Vec<DirtyReason>,
}

impl TargetState {
    /// A clean state for the given spec
    pub fn clean(spec: TargetSpec) -> Self {
        Self {
            spec,
            dirty: false,
            reasons: Vec::new(),
        }
    }

    /// A dirty state with the given reasons
    pub fn dirty(spec: TargetSpec, reasons: Vec<DirtyReason>) -> Self {
        Self {
            spec,
            dirty: true,
            reasons,
        }
    }
}

/// Result of one target in one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetOutcome {
    /// Target name
    pub target: String,
    /// Whether the compiler was invoked (false means the target was skipped)
    pub attempted: bool,
    /// Whether the target's artifact is considered current after this run
    pub succeeded: bool,
    /// Compiler exit code; 0 for skipped targets
    pub exit_code: i32,
}

impl TargetOutcome {
    /// Outcome for a clean target: skip is a success, not a no-op error
    pub fn skipped(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            attempted: false,
            succeeded: true,
            exit_code: 0,
        }
    }

    /// Outcome for an attempted build with the given exit code
    pub fn built(target: impl Into<String>, exit_code: i32) -> Self {
        Self {
            target: target.into(),
            attempted: true,
            succeeded: exit_code == 0,
            exit_code,
        }
    }
}
