//! Run reporting
//!
//! Per-target status summary printed at the end of every run, including
//! partial and aborted runs, so the operator knows which artifacts are
//! current.

use crate::targets::TargetOutcome;
use serde::Serialize;

/// How much the run prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Standard human-readable output
    #[default]
    Normal,
    /// Detailed output with per-file dirty reasons
    Verbose,
    /// Errors only
    Quiet,
    /// Machine-readable JSON summary
    Json,
}

impl OutputMode {
    pub fn is_verbose(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet | Self::Json)
    }
}

/// Final status of one target in the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    /// Up to date, compiler not invoked
    Skipped,
    /// Rebuilt successfully
    Built,
    /// Compiler returned non-zero
    Failed,
    /// Never reached because an earlier required target failed
    NotAttempted,
}

impl std::fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped => write!(f, "skipped"),
            Self::Built => write!(f, "built"),
            Self::Failed => write!(f, "failed"),
            Self::NotAttempted => write!(f, "not attempted"),
        }
    }
}

impl TargetStatus {
    fn from_outcome(outcome: &TargetOutcome) -> Self {
        match (outcome.attempted, outcome.succeeded) {
            (false, _) => Self::Skipped,
            (true, true) => Self::Built,
            (true, false) => Self::Failed,
        }
    }
}

/// End-of-run summary covering every declared target
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    /// Per-target line items, in declaration order
    pub lines: Vec<SummaryLine>,
    /// Whether the run stopped before reaching every target
    pub aborted: bool,
    /// Whether the run degraded to the fallback toolchain
    pub degraded: bool,
}

/// One target's line in the summary
#[derive(Debug, Clone, Serialize)]
pub struct SummaryLine {
    pub target: String,
    pub status: TargetStatus,
    pub exit_code: i32,
}

impl BuildSummary {
    /// Build the summary from run outcomes. Targets past an abort point get
    /// a `NotAttempted` line so the report always covers every target.
    pub fn new(
        all_targets: &[String],
        outcomes: &[TargetOutcome],
        aborted: bool,
        degraded: bool,
    ) -> Self {
        let mut lines: Vec<SummaryLine> = outcomes
            .iter()
            .map(|o| SummaryLine {
                target: o.target.clone(),
                status: TargetStatus::from_outcome(o),
                exit_code: o.exit_code,
            })
            .collect();

        for name in all_targets.iter().skip(outcomes.len()) {
            lines.push(SummaryLine {
                target: name.clone(),
                status: TargetStatus::NotAttempted,
                exit_code: 0,
            });
        }

        Self {
            lines,
            aborted,
            degraded,
        }
    }

    /// True when every attempted target succeeded and nothing was cut off
    pub fn success(&self) -> bool {
        !self.aborted
            && self
                .lines
                .iter()
                .all(|l| !matches!(l.status, TargetStatus::Failed | TargetStatus::NotAttempted))
    }

    /// Number of targets that were actually rebuilt
    pub fn built_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.status == TargetStatus::Built)
            .count()
    }

    /// Print the summary in the requested mode
    pub fn print(&self, mode: OutputMode) {
        match mode {
            OutputMode::Json => {
                // serializing a plain struct of strings and ints cannot fail
                println!("{}", serde_json::to_string(self).unwrap_or_default());
            }
            OutputMode::Quiet => {
                for line in &self.lines {
                    if line.status == TargetStatus::Failed {
                        eprintln!(
                            "{}: failed (exit code {})",
                            line.target, line.exit_code
                        );
                    }
                }
            }
            OutputMode::Normal | OutputMode::Verbose => {
                println!("\nBuild summary:");
                for line in &self.lines {
                    match line.status {
                        TargetStatus::Failed => println!(
                            "  {:<20} {} (exit code {})",
                            line.target, line.status, line.exit_code
                        ),
                        _ => println!("  {:<20} {}", line.target, line.status),
                    }
                }
                if self.degraded {
                    println!("note: preferred toolchain unavailable, used fallback");
                }
                if self.aborted {
                    println!("Build aborted after first failure.");
                }
            }
        }
    }
}
