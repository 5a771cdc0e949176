//! Project manifest (mason.toml)
//!
//! Declares the build targets, their source-file groups and expected output
//! artifacts, plus toolchain commands and cache directories.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project manifest loaded from `mason.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    /// Package metadata
    pub package: PackageConfig,

    /// Build targets, in declaration order (build order)
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetConfig>,

    /// Toolchain commands
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Cache and scratch directory settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Package metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageConfig {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Package description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One build target: a named source-file group with an expected artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    /// Target name
    pub name: String,

    /// Glob patterns for the target's source files, relative to project root
    pub patterns: Vec<String>,

    /// Entry source file handed to the compiler
    pub entry: PathBuf,

    /// Module inclusion flags passed to the compiler
    #[serde(default)]
    pub modules: Vec<String>,

    /// Expected output artifact, relative to project root
    pub artifact: PathBuf,

    /// A failed optional target does not abort the run
    #[serde(default)]
    pub optional: bool,
}

/// External compiler commands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolchainConfig {
    /// Preferred (native, faster) compiler command
    #[serde(default = "default_preferred")]
    pub preferred: String,

    /// Fallback (slower) compiler command
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_preferred() -> String {
    "mason-native-cc".to_string()
}

fn default_fallback() -> String {
    "mason-cc".to_string()
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            preferred: default_preferred(),
            fallback: default_fallback(),
        }
    }
}

/// Cache directory and transient build tree settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Directory holding the per-file hash records, relative to project root
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// Transient directories removed after every run, relative to project root
    #[serde(default = "default_scratch_dirs")]
    pub scratch_dirs: Vec<PathBuf>,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".mason/hashes")
}

fn default_scratch_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("build"), PathBuf::from("__scratch__")]
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            scratch_dirs: default_scratch_dirs(),
        }
    }
}

impl Manifest {
    /// Load manifest from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let manifest: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest
    pub fn validate(&self) -> ConfigResult<()> {
        if self.package.name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "package.name".to_string(),
                reason: "name cannot be empty".to_string(),
            });
        }

        for target in &self.targets {
            if target.name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "target.name".to_string(),
                    reason: "target name cannot be empty".to_string(),
                });
            }
            if target.patterns.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("target.{}.patterns", target.name),
                    reason: "target declares no source patterns".to_string(),
                });
            }
            if target.artifact.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("target.{}.artifact", target.name),
                    reason: "target declares no output artifact".to_string(),
                });
            }
        }

        if self.toolchain.preferred.is_empty() && self.toolchain.fallback.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "toolchain".to_string(),
                reason: "at least one toolchain command must be set".to_string(),
            });
        }

        Ok(())
    }

    /// Get package name
    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// Look up a target by name
    pub fn target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[package]
name = "demo"
version = "1.0.0"

[[target]]
name = "server"
patterns = ["server.src", "server_modules/**/*.src"]
entry = "server.src"
modules = ["server_modules"]
artifact = "dist/server.bin"

[[target]]
name = "client"
patterns = ["client.src"]
entry = "client.src"
artifact = "dist/client.bin"
optional = true

[toolchain]
preferred = "fastcc"
fallback = "slowcc"
"#;

    #[test]
    fn parses_sample_manifest() {
        let manifest: Manifest = toml::from_str(SAMPLE).unwrap();
        assert_eq!(manifest.name(), "demo");
        assert_eq!(manifest.targets.len(), 2);
        assert_eq!(manifest.targets[0].name, "server");
        assert_eq!(manifest.targets[0].modules, vec!["server_modules"]);
        assert!(!manifest.targets[0].optional);
        assert!(manifest.targets[1].optional);
        assert_eq!(manifest.toolchain.preferred, "fastcc");
    }

    #[test]
    fn cache_defaults_apply() {
        let manifest: Manifest = toml::from_str(SAMPLE).unwrap();
        assert_eq!(manifest.cache.dir, PathBuf::from(".mason/hashes"));
        assert_eq!(manifest.cache.scratch_dirs.len(), 2);
    }

    #[test]
    fn toolchain_defaults_apply() {
        let minimal = r#"
[package]
name = "demo"
version = "0.1.0"
"#;
        let manifest: Manifest = toml::from_str(minimal).unwrap();
        assert_eq!(manifest.toolchain.preferred, "mason-native-cc");
        assert_eq!(manifest.toolchain.fallback, "mason-cc");
    }

    #[test]
    fn load_from_file_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = Manifest::load_from_file(&temp.path().join("mason.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn load_from_file_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mason.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let manifest = Manifest::load_from_file(&path).unwrap();
        assert_eq!(manifest.target("client").unwrap().entry, PathBuf::from("client.src"));
        assert!(manifest.target("nope").is_none());
    }

    #[test]
    fn validate_rejects_empty_patterns() {
        let bad = r#"
[package]
name = "demo"
version = "0.1.0"

[[target]]
name = "server"
patterns = []
entry = "server.src"
artifact = "dist/server.bin"
"#;
        let manifest: Manifest = toml::from_str(bad).unwrap();
        let err = manifest.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let bad = r#"
[package]
name = ""
version = "0.1.0"
"#;
        let manifest: Manifest = toml::from_str(bad).unwrap();
        assert!(manifest.validate().is_err());
    }
}
