// src/recipe/kitchen/mod.rs

//! Kitchen: the build environment for cooking recipes
//!
//! The Kitchen owns everything a cook needs from the outside world:
//! - the host platform adapter (path translation, executable suffix)
//! - the source fetcher (download, verify, unpack, patch)
//! - the toolchain runner (configure, make, install)
//! - an optional requirement resolver

mod archive;
mod config;
mod cook;
mod fetcher;
pub mod requirements;
mod toolchain;

pub use config::{CookResult, KitchenConfig, BASH_PATH_ENV};
pub use cook::{Cook, CookStage};
pub use fetcher::{ArchiveFetcher, SourceFetcher};
pub use requirements::{NoopResolver, RequirementResolver, RequirementsResult};
pub use toolchain::{shell_quote, Autotools, CommandOutput, ConfiguredToolchain, ToolchainRunner};

use crate::error::{Error, Result};
use crate::platform::{host_platform, BuildSettings, HostPlatform, PosixSubsystem};
use crate::recipe::data::SourceTable;
use crate::recipe::exports::PackageMetadata;
use crate::recipe::format::{Recipe, Requirement};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    settings: BuildSettings,
    subsystem: Option<PosixSubsystem>,
    pub(crate) platform: Arc<dyn HostPlatform>,
    pub(crate) fetcher: Arc<dyn SourceFetcher>,
    pub(crate) toolchain: Arc<dyn ToolchainRunner>,
    /// Optional resolver for requirements
    resolver: Option<Arc<dyn RequirementResolver>>,
}

impl Kitchen {
    /// Create a Kitchen for the current build host
    pub fn new(config: KitchenConfig) -> Self {
        Self::for_settings(config, BuildSettings::detect(), PosixSubsystem::detect())
    }

    /// Create a Kitchen for explicit build settings
    pub fn for_settings(
        config: KitchenConfig,
        settings: BuildSettings,
        subsystem: Option<PosixSubsystem>,
    ) -> Self {
        let platform = host_platform(&settings, subsystem);
        let fetcher = Arc::new(ArchiveFetcher::new(&config.source_cache));
        let toolchain = Arc::new(Autotools::new(
            Arc::clone(&platform),
            config.bash_path.clone(),
            config.jobs,
        ));

        Self {
            config,
            settings,
            subsystem,
            platform,
            fetcher,
            toolchain,
            resolver: None,
        }
    }

    /// Create a Kitchen with default configuration
    pub fn with_defaults() -> Self {
        Self::new(KitchenConfig::from_env())
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn platform(&self) -> &dyn HostPlatform {
        self.platform.as_ref()
    }

    /// Set the requirement resolver
    pub fn set_resolver(&mut self, resolver: Arc<dyn RequirementResolver>) {
        self.resolver = Some(resolver);
    }

    /// Replace the source fetcher
    pub fn set_fetcher(&mut self, fetcher: Arc<dyn SourceFetcher>) {
        self.fetcher = fetcher;
    }

    /// Replace the toolchain runner
    pub fn set_toolchain(&mut self, toolchain: Arc<dyn ToolchainRunner>) {
        self.toolchain = toolchain;
    }

    /// All requirements of `recipe` on this kitchen's build host
    pub fn requirements_for(&self, recipe: &Recipe) -> (Vec<Requirement>, Vec<Requirement>) {
        let build = recipe.build_requirements(
            &self.settings,
            self.subsystem,
            self.config.bash_path.is_some(),
        );
        (recipe.requirements(), build)
    }

    /// Resolve requirements for a recipe
    ///
    /// Checks which requirements are missing and installs them if a resolver
    /// is configured. Without a resolver all requirements are assumed to be
    /// available.
    pub fn resolve_requirements(&self, recipe: &Recipe) -> Result<RequirementsResult> {
        let (requires, build_requires) = self.requirements_for(recipe);
        let mut all = requires;
        all.extend(build_requires.iter().cloned());

        if all.is_empty() {
            debug!("No requirements specified in recipe");
            return Ok(RequirementsResult::default());
        }

        info!("Checking requirements: {}", join(&all));

        let resolver = match &self.resolver {
            Some(r) => r,
            None => {
                debug!("No requirement resolver configured, assuming all are available");
                return Ok(RequirementsResult {
                    already_installed: all,
                    ..Default::default()
                });
            }
        };

        let missing = resolver.check_missing(&all)?;

        if missing.is_empty() {
            info!("All requirements are already installed");
            return Ok(RequirementsResult {
                already_installed: all,
                ..Default::default()
            });
        }

        let missing_set: HashSet<&Requirement> = missing.iter().collect();
        let already_installed: Vec<Requirement> = all
            .iter()
            .filter(|r| !missing_set.contains(r))
            .cloned()
            .collect();

        info!("Installing missing requirements: {}", join(&missing));
        let installed = resolver.install(&missing)?;

        let installed_set: HashSet<&Requirement> = installed.iter().collect();
        let unresolved: Vec<Requirement> = missing
            .iter()
            .filter(|r| !installed_set.contains(r))
            .cloned()
            .collect();

        if !unresolved.is_empty() {
            warn!("Could not resolve requirements: {}", join(&unresolved));
        }

        let build_only = installed
            .iter()
            .filter(|r| build_requires.contains(r))
            .cloned()
            .collect();

        Ok(RequirementsResult {
            already_installed,
            newly_installed: installed,
            build_only,
            unresolved,
        })
    }

    /// Remove build requirements that were installed for a cook
    fn cleanup_requirements(&self, result: &RequirementsResult) -> Result<()> {
        if result.build_only.is_empty() {
            return Ok(());
        }

        let resolver = match &self.resolver {
            Some(r) => r,
            None => return Ok(()),
        };

        info!("Cleaning up build requirements: {}", join(&result.build_only));
        resolver.cleanup(&result.build_only)
    }

    /// Directory a version of `recipe` is published into
    pub fn package_dir(&self, recipe: &Recipe, version: &str, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}-{}", recipe.package.name, version))
    }

    /// Cook a recipe version and publish the package
    ///
    /// This is the main entry point for building from source.
    ///
    /// ## Full Cooking Process
    /// 1. **Requirements**: Resolve and install requirements (if enabled)
    /// 2. **Source**: Fetch, verify and unpack the source archive
    /// 3. **Patch**: Apply the version's patches in order
    /// 4. **Configure / Build**: Run configure and make
    /// 5. **Package**: Copy licenses, install, prune, add suffixes
    /// 6. **Publish**: Compute the environment and write package metadata
    /// 7. **Cleanup**: Remove temporarily installed build requirements
    pub fn cook(
        &self,
        recipe: &Recipe,
        table: &SourceTable,
        version: &str,
        output_dir: &Path,
    ) -> Result<CookResult> {
        info!("Cooking {} version {}", recipe.package.name, version);

        let package_dir = self.package_dir(recipe, version, output_dir);

        // Fails before anything is written when the version is unknown
        let mut cook = Cook::new(self, recipe, table, version, &package_dir)?;

        let requirements = if self.config.auto_requirements {
            info!("Resolving requirements...");
            let result = self.resolve_requirements(recipe)?;

            if !result.unresolved.is_empty() {
                return Err(Error::ResolutionError(join(&result.unresolved)));
            }

            Some(result)
        } else {
            None
        };

        // Wrap the build in a closure so we can ensure cleanup happens
        let build_result = (|| -> Result<CookResult> {
            if package_dir.exists() {
                warn!("Replacing existing package at {}", package_dir.display());
                fs::remove_dir_all(&package_dir)?;
            }
            fs::create_dir_all(output_dir)?;

            info!("Fetching and unpacking sources...");
            cook.source()?;
            cook.patch()?;

            info!("Configuring and building...");
            let configured = cook.configure()?;
            cook.build(&configured)?;

            info!("Packaging...");
            cook.package(&configured)?;
            let exports = cook.package_info()?;

            let metadata_path = output_dir.join(format!("{}-{}.json", recipe.package.name, version));
            let metadata = PackageMetadata {
                name: recipe.package.name.clone(),
                version: version.to_string(),
                os_build: self.settings.os_build.to_string(),
                arch_build: self.settings.arch_build.to_string(),
                license: recipe.package.license.clone(),
                requires: recipe.requirements().iter().map(ToString::to_string).collect(),
                env: exports.clone(),
            };
            metadata.write(&metadata_path)?;

            info!("Cooked: {}", package_dir.display());

            let build_dir = if self.config.keep_builddir {
                cook.keep_build_dir()
            } else {
                None
            };

            Ok(CookResult {
                package_dir: package_dir.clone(),
                metadata_path,
                exports,
                log: std::mem::take(&mut cook.log),
                warnings: std::mem::take(&mut cook.warnings),
                requirements: requirements.clone(),
                build_dir,
            })
        })();

        if self.config.cleanup_requirements
            && let Some(ref result) = requirements
            && let Err(e) = self.cleanup_requirements(result)
        {
            warn!("Failed to clean up build requirements: {}", e);
            // Don't fail the build just because cleanup failed
        }

        build_result
    }

    /// Fetch sources for a version without building
    ///
    /// Downloads and verifies the source archive, caching it locally so a
    /// later cook can run offline.
    pub fn fetch(&self, table: &SourceTable, version: &str) -> Result<PathBuf> {
        let entry = table.source(version)?;
        info!("Fetching sources for version {}", version);
        self.fetcher.fetch(entry)
    }

    /// Check if the source archive for a version is already cached
    pub fn sources_cached(&self, table: &SourceTable, version: &str) -> bool {
        table
            .source(version)
            .map(|entry| self.fetcher.is_cached(entry))
            .unwrap_or(false)
    }

    /// Create a fresh temporary build directory
    pub(crate) fn create_build_dir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("automake-kitchen-");

        let dir = match &self.config.build_root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        };

        dir.map_err(|e| Error::IoError(format!("Failed to create build directory: {}", e)))
    }
}

fn join(reqs: &[Requirement]) -> String {
    reqs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
