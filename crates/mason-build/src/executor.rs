//! External compiler invocation
//!
//! Composes the flag set for each dirty target and runs the compiler
//! synchronously, in declaration order, aborting after the first failed
//! required target.

use crate::output::OutputMode;
use crate::profile::BuildConfig;
use crate::targets::{TargetOutcome, TargetState};
use crate::toolchain::Toolchain;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Runs dirty targets through the external compiler
#[derive(Debug)]
pub struct Executor<'a> {
    root: &'a Path,
    config: &'a BuildConfig,
    output: OutputMode,
}

impl<'a> Executor<'a> {
    pub fn new(root: &'a Path, config: &'a BuildConfig, output: OutputMode) -> Self {
        Self {
            root,
            config,
            output,
        }
    }

    /// Build one target. Clean targets are skipped immediately; skip is a
    /// success. Compiler stdout/stderr pass straight through to the user.
    /// A non-zero exit is reported in the outcome, never retried; a compiler
    /// that cannot be launched at all counts as a failed attempt too, so the
    /// run's other results survive.
    pub fn run(&self, state: &TargetState) -> TargetOutcome {
        if !state.dirty {
            if self.output.is_verbose() {
                println!("  {} is up to date, skipping", state.spec.name);
            }
            return TargetOutcome::skipped(&state.spec.name);
        }

        let args = self.compose_args(state);

        if self.output.is_verbose() {
            println!(
                "  Building {} with {} ({})",
                state.spec.name, self.config.toolchain.command, self.config.toolchain.toolchain
            );
            for reason in &state.reasons {
                println!("    {reason}");
            }
        }

        let status = Command::new(&self.config.toolchain.command)
            .args(&args)
            .current_dir(self.root)
            .status();

        let exit_code = match status {
            // A killed compiler reports no code; treat it as failure
            Ok(status) => status.code().unwrap_or(-1),
            Err(e) => {
                eprintln!(
                    "error: failed to launch compiler '{}' for target '{}': {e}",
                    self.config.toolchain.command, state.spec.name
                );
                -1
            }
        };
        TargetOutcome::built(&state.spec.name, exit_code)
    }

    /// Build every target sequentially in declaration order. The loop stops
    /// after a failed required target; failed optional targets are recorded
    /// and the run continues. Returns the outcomes gathered so far and
    /// whether the run aborted early.
    pub fn run_all(&self, states: &[TargetState]) -> (Vec<TargetOutcome>, bool) {
        let mut outcomes = Vec::with_capacity(states.len());

        for state in states {
            let outcome = self.run(state);
            let failed = !outcome.succeeded;
            outcomes.push(outcome);

            if failed && !state.spec.optional {
                return (outcomes, true);
            }
        }

        (outcomes, false)
    }

    /// Compose the compiler argument list: target-fixed flags (modules,
    /// output, entry) plus configuration-derived flags (console,
    /// optimization, backend selector).
    fn compose_args(&self, state: &TargetState) -> Vec<OsString> {
        let spec = &state.spec;
        let mut args: Vec<OsString> = Vec::new();

        for module in &spec.modules {
            args.push("--module".into());
            args.push(module.into());
        }

        args.push(if self.config.console_visible {
            "--console".into()
        } else {
            "--no-console".into()
        });

        if self.config.optimize {
            args.push("--optimize".into());
        }

        args.push("--backend".into());
        args.push(match self.config.toolchain.toolchain {
            Toolchain::Preferred => "preferred".into(),
            Toolchain::Fallback => "fallback".into(),
        });

        args.push("--out-dir".into());
        args.push(spec.output_dir().into_os_string());
        args.push("--name".into());
        args.push(spec.output_filename().into());

        args.push(spec.entry.clone().into_os_string());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{BuildConfig, ConfigAnswers, Variant};
    use crate::targets::{DirtyReason, TargetSpec};
    use crate::toolchain::ToolchainSelection;
    use pretty_assertions::assert_eq;

    fn config(console: bool, variant: Variant) -> BuildConfig {
        BuildConfig::resolve(
            ConfigAnswers {
                console: Some(console),
                variant: Some(variant),
            },
            ToolchainSelection {
                toolchain: Toolchain::Fallback,
                command: "cc".to_string(),
                degraded: true,
            },
        )
    }

    fn spec() -> TargetSpec {
        TargetSpec::new("server")
            .with_patterns(vec!["server/**/*.src".to_string()])
            .with_entry("server/main.src")
            .with_modules(vec!["net".to_string(), "store".to_string()])
            .with_artifact("dist/server.bin")
    }

    #[test]
    fn composes_full_flag_set() {
        let config = config(false, Variant::Release);
        let root = Path::new(".");
        let executor = Executor::new(root, &config, OutputMode::Quiet);
        let state = TargetState::dirty(spec(), vec![DirtyReason::ArtifactMissing]);

        let args = executor.compose_args(&state);
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "--module",
                "net",
                "--module",
                "store",
                "--no-console",
                "--optimize",
                "--backend",
                "fallback",
                "--out-dir",
                "dist",
                "--name",
                "server.bin",
                "server/main.src",
            ]
        );
    }

    #[test]
    fn debug_console_build_omits_optimize() {
        let config = config(true, Variant::Debug);
        let executor = Executor::new(Path::new("."), &config, OutputMode::Quiet);
        let state = TargetState::dirty(spec(), vec![DirtyReason::Forced]);

        let args = executor.compose_args(&state);
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.contains(&"--console".to_string()));
        assert!(!args.contains(&"--optimize".to_string()));
    }

    #[test]
    fn clean_target_is_skipped_without_invocation() {
        // Command "cc" may not exist here; skipping must not try to run it
        let config = config(true, Variant::Debug);
        let executor = Executor::new(Path::new("."), &config, OutputMode::Quiet);
        let state = TargetState::clean(spec());

        let outcome = executor.run(&state);
        assert!(!outcome.attempted);
        assert!(outcome.succeeded);
        assert_eq!(outcome.exit_code, 0);
    }

    #[test]
    fn unlaunchable_compiler_is_a_failed_attempt() {
        let mut config = config(true, Variant::Debug);
        config.toolchain.command = "/nonexistent/masoncc".to_string();
        let executor = Executor::new(Path::new("."), &config, OutputMode::Quiet);
        let state = TargetState::dirty(spec(), vec![DirtyReason::Forced]);

        let outcome = executor.run(&state);
        assert!(outcome.attempted);
        assert!(!outcome.succeeded);
        assert_eq!(outcome.exit_code, -1);
    }

    #[test]
    fn unlaunchable_compiler_aborts_but_keeps_earlier_outcomes() {
        let mut config = config(true, Variant::Debug);
        config.toolchain.command = "/nonexistent/masoncc".to_string();
        let executor = Executor::new(Path::new("."), &config, OutputMode::Quiet);
        let states = vec![
            TargetState::clean(spec()),
            TargetState::dirty(spec(), vec![DirtyReason::Forced]),
            TargetState::clean(spec()),
        ];

        let (outcomes, aborted) = executor.run_all(&states);
        assert!(aborted);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].succeeded);
        assert!(!outcomes[1].succeeded);
    }
}
