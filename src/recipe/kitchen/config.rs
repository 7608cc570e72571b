// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use crate::recipe::exports::EnvironmentExports;
use std::ffi::OsString;
use std::path::PathBuf;

use super::requirements::RequirementsResult;

/// Environment variable pointing at an existing `bash` on Windows hosts
///
/// When set, no POSIX environment package is required for the build.
pub const BASH_PATH_ENV: &str = "KITCHEN_BASH_PATH";

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Directory for downloaded sources
    pub source_cache: PathBuf,
    /// Parent directory for temporary build directories (system temp if unset)
    pub build_root: Option<PathBuf>,
    /// Number of parallel make jobs
    pub jobs: u32,
    /// Keep build directory after completion (for debugging)
    pub keep_builddir: bool,
    /// Explicit `bash` used to run the toolchain on Windows hosts
    pub bash_path: Option<PathBuf>,
    /// Install missing requirements through the configured resolver
    pub auto_requirements: bool,
    /// Remove build requirements installed for a cook once it finishes
    ///
    /// Only meaningful if auto_requirements is true.
    pub cleanup_requirements: bool,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        let source_cache = dirs::cache_dir()
            .map(|dir| dir.join("automake-kitchen").join("sources"))
            .unwrap_or_else(|| PathBuf::from("/var/cache/automake-kitchen/sources"));

        Self {
            source_cache,
            build_root: None,
            jobs,
            keep_builddir: false,
            bash_path: None,
            auto_requirements: false, // Off by default, requires resolver
            cleanup_requirements: true,
        }
    }
}

impl KitchenConfig {
    /// Default configuration with overrides taken from the environment
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var_os(name))
    }

    /// Default configuration with overrides read through `var`
    pub fn from_vars(var: impl Fn(&str) -> Option<OsString>) -> Self {
        let mut config = Self::default();
        if let Some(bash) = var(BASH_PATH_ENV).filter(|v| !v.is_empty()) {
            config.bash_path = Some(PathBuf::from(bash));
        }
        config
    }

    /// Create a configuration with requirement auto-resolution
    pub fn with_auto_requirements(cleanup: bool) -> Self {
        Self {
            auto_requirements: true,
            cleanup_requirements: cleanup,
            ..Self::default()
        }
    }
}

/// Result of cooking a recipe
#[derive(Debug)]
pub struct CookResult {
    /// Root of the published package
    pub package_dir: PathBuf,
    /// JSON metadata written next to the package
    pub metadata_path: PathBuf,
    /// Environment exported to consumers
    pub exports: EnvironmentExports,
    /// Build log
    pub log: String,
    /// Warnings generated during build
    pub warnings: Vec<String>,
    /// Requirement resolution result (if auto_requirements was enabled)
    pub requirements: Option<RequirementsResult>,
    /// Build directory, when kept for debugging
    pub build_dir: Option<PathBuf>,
}
