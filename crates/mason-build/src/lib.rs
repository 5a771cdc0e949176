//! Mason build engine
//!
//! Decides, per invocation, which build targets actually need to be rebuilt
//! and drives an external compiler for the dirty ones:
//! - Content-hash change detection backed by a persistent hash store
//! - File-group to target aggregation and skip/build planning
//! - Build configuration resolution (console mode, optimization, toolchain)
//! - Sequential target execution with early abort on required failures
//! - Unconditional scratch-directory cleanup

pub mod builder;
pub mod cleaner;
pub mod detector;
pub mod error;
pub mod executor;
pub mod hash_store;
pub mod output;
pub mod planner;
pub mod profile;
pub mod targets;
pub mod toolchain;

// Re-export main types
pub use builder::{Builder, RunReport};
pub use cleaner::clean_scratch_dirs;
pub use detector::{ChangeDetector, FileChange};
pub use error::{BuildError, BuildResult};
pub use hash_store::HashStore;
pub use output::{BuildSummary, OutputMode, TargetStatus};
pub use planner::RebuildPlanner;
pub use profile::{BuildConfig, ConfigAnswers, Variant};
pub use targets::{DirtyReason, TargetOutcome, TargetSpec, TargetState};
pub use toolchain::{probe_command, resolve_toolchain, Toolchain, ToolchainSelection};

// Re-export manifest types for convenience
pub use mason_config::Manifest;
