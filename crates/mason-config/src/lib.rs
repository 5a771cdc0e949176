//! Mason configuration system
//!
//! Loads and validates the project manifest (`mason.toml`) that declares
//! build targets, toolchain commands, and cache settings.
//!
//! # Example
//!
//! ```no_run
//! use mason_config::Manifest;
//! use std::path::Path;
//!
//! let manifest = Manifest::load_from_file(Path::new("mason.toml")).unwrap();
//! for target in &manifest.targets {
//!     println!("{}", target.name);
//! }
//! ```

pub mod manifest;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use manifest::{CacheConfig, Manifest, PackageConfig, TargetConfig, ToolchainConfig};
