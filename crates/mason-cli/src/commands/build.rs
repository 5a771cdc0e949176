//! Build command - incremental rebuild of the project's targets

use crate::prompt;
use crate::Mode;
use anyhow::{bail, Context, Result};
use mason_build::{
    clean_scratch_dirs, resolve_toolchain, BuildConfig, Builder, ConfigAnswers, OutputMode,
    Variant,
};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Build command arguments
#[derive(Default)]
pub struct BuildArgs {
    /// Build mode (clean, fast, full, cached)
    pub mode: Option<Mode>,
    /// Build variant name
    pub variant: Option<String>,
    /// Shorthand for --variant=release
    pub release: bool,
    /// Console kept visible
    pub console: bool,
    /// Console hidden
    pub no_console: bool,
    /// Accept defaults instead of prompting
    pub yes: bool,
    /// Verbose output
    pub verbose: bool,
    /// Quiet output
    pub quiet: bool,
    /// JSON summary
    pub json: bool,
    /// Project directory
    pub project_dir: Option<PathBuf>,
}

/// Run the build command
pub fn run(args: BuildArgs) -> Result<()> {
    let project_dir = args
        .project_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let mode = args.mode.unwrap_or(Mode::Cached);
    let output_mode = determine_output_mode(&args);

    let mut builder = Builder::new(&project_dir)
        .context("Failed to load project")?
        .with_output_mode(output_mode);

    if mode == Mode::Clean {
        if !args.quiet && !args.json {
            println!("Cleaning build artifacts...");
        }
        builder.clean().context("Failed to clean build artifacts")?;
    }

    // Clean and full both distrust every cached decision
    builder = builder.with_force(matches!(mode, Mode::Clean | Mode::Full));

    // Probe the toolchain once, before any target is attempted. Scratch
    // trees left by an interrupted earlier run are cleaned even on this
    // fatal path.
    let toolchain = match resolve_toolchain(&builder.manifest().toolchain) {
        Ok(toolchain) => toolchain,
        Err(e) => {
            clean_scratch_dirs(
                &project_dir,
                &builder.manifest().cache.scratch_dirs,
                output_mode,
            );
            return Err(e).context("No usable toolchain found");
        }
    };
    if toolchain.degraded && !args.quiet && !args.json {
        eprintln!(
            "warning: preferred compiler unavailable, falling back to '{}' (slower builds)",
            toolchain.command
        );
    }

    // Gather answers from flags, environment, or an interactive pass; the
    // resolver itself never prompts
    let answers = gather_answers(&args)?;
    let config = BuildConfig::resolve(answers, toolchain);

    let report = builder.execute(&config).context("Build failed")?;

    if !report.success() {
        bail!("one or more targets failed to build");
    }

    if args.verbose {
        println!(
            "{} target(s) rebuilt, {} up to date",
            report.summary.built_count(),
            report.summary.lines.len() - report.summary.built_count()
        );
    }

    Ok(())
}

/// Determine console/variant answers. Flags win; otherwise prompt when
/// interactive, else fall back to the documented defaults.
fn gather_answers(args: &BuildArgs) -> Result<ConfigAnswers> {
    let mut answers = ConfigAnswers::default();

    if args.console {
        answers.console = Some(true);
    } else if args.no_console {
        answers.console = Some(false);
    }

    if args.release {
        answers.variant = Some(Variant::Release);
    } else if let Some(ref name) = args.variant {
        let variant = Variant::from_str(name).map_err(|e| anyhow::anyhow!(e))?;
        answers.variant = Some(variant);
    }

    let interactive = !args.yes && std::io::stdin().is_terminal();
    if interactive {
        if answers.console.is_none() {
            answers.console = Some(prompt::confirm("Keep console window visible?", true)?);
        }
        if answers.variant.is_none() {
            answers.variant = Some(prompt::variant(Variant::Debug)?);
        }
    }

    Ok(answers)
}

/// Determine output mode from arguments
fn determine_output_mode(args: &BuildArgs) -> OutputMode {
    if args.json {
        OutputMode::Json
    } else if args.quiet {
        OutputMode::Quiet
    } else if args.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    }
}
