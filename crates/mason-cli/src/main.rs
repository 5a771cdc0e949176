use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod prompt;

/// Mason incremental build orchestrator.
///
/// Mason decides, per invocation, which build targets actually need to be
/// rebuilt based on content-hash change detection, then drives the external
/// compiler for exactly those targets.
///
/// EXAMPLES:
///     mason build                   Incremental build (cached mode)
///     mason build --mode full       Rebuild every target
///     mason build --release         Optimized build
///     mason clean                   Remove artifacts and the hash cache
///
/// ENVIRONMENT VARIABLES:
///     MASON_MODE      Default build mode (clean, fast, full, cached)
///     MASON_VARIANT   Default build variant (debug, release)
#[derive(Parser)]
#[command(name = "mason")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Build mode selecting how much of the cache is trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Wipe artifacts and cache, then rebuild everything
    Clean,
    /// Incremental build (alias of cached)
    Fast,
    /// Rebuild every target, keeping the cache warm
    Full,
    /// Incremental build: only changed targets are rebuilt (default)
    Cached,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project
    ///
    /// Scans every declared source group, marks targets dirty when a member
    /// file changed or the output artifact is missing, and invokes the
    /// compiler for dirty targets only, in declaration order.
    ///
    /// EXAMPLES:
    ///     mason build                       Incremental debug build
    ///     mason build --release --no-console  Optimized, windowless
    ///     mason build --mode clean --yes    Full scratch rebuild, no prompts
    #[command(visible_alias = "b")]
    Build {
        /// Build mode
        #[arg(long, short = 'm', value_enum, env = "MASON_MODE")]
        mode: Option<Mode>,
        /// Build variant (debug or release)
        #[arg(long, env = "MASON_VARIANT")]
        variant: Option<String>,
        /// Build in release mode (shorthand for --variant=release)
        #[arg(long, conflicts_with = "variant")]
        release: bool,
        /// Built executables keep a visible console
        #[arg(long, overrides_with = "no_console")]
        console: bool,
        /// Built executables hide the console window
        #[arg(long, overrides_with = "console")]
        no_console: bool,
        /// Accept defaults instead of prompting
        #[arg(long, short = 'y')]
        yes: bool,
        /// Verbose output with per-target dirty reasons
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Quiet output (errors only)
        #[arg(long, short = 'q', conflicts_with = "verbose")]
        quiet: bool,
        /// Machine-readable JSON summary
        #[arg(long, env = "MASON_JSON")]
        json: bool,
        /// Project directory (defaults to current directory)
        #[arg(long)]
        project_dir: Option<PathBuf>,
    },

    /// Remove build artifacts, scratch directories, and the hash cache
    ///
    /// EXAMPLES:
    ///     mason clean
    Clean {
        /// Project directory (defaults to current directory)
        #[arg(long)]
        project_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            mode,
            variant,
            release,
            console,
            no_console,
            yes,
            verbose,
            quiet,
            json,
            project_dir,
        } => commands::build::run(commands::build::BuildArgs {
            mode,
            variant,
            release,
            console,
            no_console,
            yes,
            verbose,
            quiet,
            json,
            project_dir,
        }),
        Commands::Clean { project_dir } => commands::clean::run(project_dir),
    }
}
