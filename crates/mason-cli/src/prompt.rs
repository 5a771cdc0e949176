//! Interactive prompting
//!
//! Gathers answers before configuration resolution runs; the decision engine
//! never prompts. Empty input accepts the default, invalid input re-prompts.

use anyhow::Result;
use mason_build::Variant;
use std::io::{self, Write};

/// Ask a yes/no question
pub fn confirm(question: &str, default: bool) -> Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    loop {
        print!("{question} [{hint}]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        match input.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            other => println!("Unrecognized answer '{other}', expected y or n."),
        }
    }
}

/// Ask for the build variant
pub fn variant(default: Variant) -> Result<Variant> {
    loop {
        print!("Build variant (debug/release) [{default}]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            return Ok(default);
        }
        match Variant::from_str(input) {
            Ok(v) => return Ok(v),
            Err(e) => println!("{e}"),
        }
    }
}
