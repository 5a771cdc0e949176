//! Toolchain detection
//!
//! Probes for the preferred native compiler and degrades to the slower
//! fallback when it is absent. Missing preferred tooling is a warning;
//! missing both is fatal before any target is attempted.

use crate::error::{BuildError, BuildResult};
use mason_config::ToolchainConfig;
use std::process::{Command, Stdio};

/// Which compiler backend a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    /// Preferred native compiler
    Preferred,
    /// Degraded mode: slower generic compiler
    Fallback,
}

impl std::fmt::Display for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preferred => write!(f, "preferred"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Result of probing the configured toolchain commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainSelection {
    /// Which backend was chosen
    pub toolchain: Toolchain,
    /// The command to invoke
    pub command: String,
    /// True when the preferred compiler was missing and the run degraded
    pub degraded: bool,
}

/// Check whether a command can be spawned at all. The probe runs
/// `<command> --version` with stdio suppressed; any spawn success counts,
/// whatever the exit code, since presence is all we need.
pub fn probe_command(command: &str) -> bool {
    if command.is_empty() {
        return false;
    }
    Command::new(command)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Pick a usable compiler from the configured commands
pub fn resolve_toolchain(config: &ToolchainConfig) -> BuildResult<ToolchainSelection> {
    if probe_command(&config.preferred) {
        return Ok(ToolchainSelection {
            toolchain: Toolchain::Preferred,
            command: config.preferred.clone(),
            degraded: false,
        });
    }

    if probe_command(&config.fallback) {
        return Ok(ToolchainSelection {
            toolchain: Toolchain::Fallback,
            command: config.fallback.clone(),
            degraded: true,
        });
    }

    Err(BuildError::NoToolchain {
        preferred: config.preferred.clone(),
        fallback: config.fallback.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_missing_command_is_false() {
        assert!(!probe_command("mason-test-no-such-command-on-any-machine"));
        assert!(!probe_command(""));
    }

    #[test]
    fn probe_present_command_is_true() {
        // `sh` exists on every platform the test suite runs on
        assert!(probe_command("sh"));
    }

    #[test]
    fn resolve_prefers_the_preferred_command() {
        let config = ToolchainConfig {
            preferred: "sh".to_string(),
            fallback: "sh".to_string(),
        };
        let selection = resolve_toolchain(&config).unwrap();
        assert_eq!(selection.toolchain, Toolchain::Preferred);
        assert!(!selection.degraded);
    }

    #[test]
    fn resolve_degrades_to_fallback() {
        let config = ToolchainConfig {
            preferred: "mason-test-no-such-command-on-any-machine".to_string(),
            fallback: "sh".to_string(),
        };
        let selection = resolve_toolchain(&config).unwrap();
        assert_eq!(selection.toolchain, Toolchain::Fallback);
        assert_eq!(selection.command, "sh");
        assert!(selection.degraded);
    }

    #[test]
    fn resolve_fails_when_nothing_is_available() {
        let config = ToolchainConfig {
            preferred: "mason-test-missing-a".to_string(),
            fallback: "mason-test-missing-b".to_string(),
        };
        assert!(matches!(
            resolve_toolchain(&config),
            Err(BuildError::NoToolchain { .. })
        ));
    }
}
