//! Build configuration resolution
//!
//! Resolves the configuration matrix (console visibility, optimization,
//! toolchain) once per invocation. `resolve` is pure: it consumes an
//! already-gathered answer set, so interactive prompting stays out of the
//! decision engine.

use crate::toolchain::ToolchainSelection;

/// Build variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Unoptimized build (default)
    Debug,
    /// Optimized build
    Release,
}

impl Variant {
    /// Parse a variant from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            other => Err(format!("unknown variant '{other}' (expected debug or release)")),
        }
    }

    /// Variant name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    /// Whether this variant compiles with optimization
    pub fn optimize(&self) -> bool {
        matches!(self, Self::Release)
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::Debug
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Answers gathered from CLI flags, environment, or an interactive pass.
/// `None` means "not supplied"; `resolve` fills in the documented default.
#[derive(Debug, Clone, Default)]
pub struct ConfigAnswers {
    /// Whether built executables keep a visible console (default: true)
    pub console: Option<bool>,
    /// Build variant (default: debug)
    pub variant: Option<Variant>,
}

/// Resolved build configuration, immutable for the remainder of the run and
/// shared read-only by every target build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Whether built executables keep a visible console window
    pub console_visible: bool,
    /// Whether the compiler optimizes
    pub optimize: bool,
    /// The probed compiler backend
    pub toolchain: ToolchainSelection,
}

impl BuildConfig {
    /// Resolve the configuration matrix from gathered answers and the probed
    /// toolchain. Each axis falls back to its documented default when no
    /// answer was supplied.
    pub fn resolve(answers: ConfigAnswers, toolchain: ToolchainSelection) -> Self {
        let variant = answers.variant.unwrap_or_default();
        Self {
            console_visible: answers.console.unwrap_or(true),
            optimize: variant.optimize(),
            toolchain,
        }
    }
}
