//! Clean command - remove artifacts, scratch directories, and the hash cache

use anyhow::{Context, Result};
use mason_build::Builder;
use std::path::PathBuf;

/// Run the clean command
pub fn run(project_dir: Option<PathBuf>) -> Result<()> {
    let project_dir = project_dir.unwrap_or_else(|| PathBuf::from("."));

    let builder = Builder::new(&project_dir).context("Failed to load project")?;
    builder.clean().context("Failed to clean build artifacts")?;

    println!("Cleaned build artifacts and hash cache.");
    Ok(())
}
