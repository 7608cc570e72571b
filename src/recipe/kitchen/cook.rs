// src/recipe/kitchen/cook.rs

//! Cook: the actual build execution for a single recipe version
//!
//! A cook walks through its stages strictly in order:
//!
//! ```text
//! Uninitialized -> Sourced -> Patched -> Configured -> Built -> Packaged -> Published
//! ```
//!
//! Calling a step from the wrong stage fails with [`Error::InvalidStage`].
//! Only `configure` may be repeated: once configured, it hands back the same
//! handle without running the toolchain again.

use crate::error::{Error, Result};
use crate::platform::HostPlatform;
use crate::recipe::data::{PatchInfo, SourceEntry, SourceTable};
use crate::recipe::exports::{automake_exports, EnvironmentExports};
use crate::recipe::format::Recipe;
use crate::recipe::layout::{PackageLayout, SOURCE_SUBFOLDER};
use crate::version::version_major_minor;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::toolchain::{CommandOutput, ConfiguredToolchain};
use super::Kitchen;

/// Lifecycle stage of a cook
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CookStage {
    Uninitialized,
    Sourced,
    Patched,
    Configured,
    Built,
    Packaged,
    Published,
}

impl fmt::Display for CookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Sourced => "sourced",
            Self::Patched => "patched",
            Self::Configured => "configured",
            Self::Built => "built",
            Self::Packaged => "packaged",
            Self::Published => "published",
        };
        f.write_str(name)
    }
}

/// A single cook operation
pub struct Cook<'a> {
    kitchen: &'a Kitchen,
    recipe: &'a Recipe,
    table: &'a SourceTable,
    version: String,
    major_minor: String,
    source: &'a SourceEntry,
    patches: &'a [PatchInfo],
    layout: PackageLayout,
    /// Temporary build directory, created by the source step
    build_dir: Option<TempDir>,
    stage: CookStage,
    configured: Option<Arc<ConfiguredToolchain>>,
    /// Build log accumulator
    pub(super) log: String,
    /// Warnings
    pub(super) warnings: Vec<String>,
}

impl<'a> Cook<'a> {
    /// Prepare a cook of `version`, publishing into `package_dir`
    ///
    /// Looks up all metadata for the version up front; nothing touches the
    /// file system until [`Cook::source`].
    pub fn new(
        kitchen: &'a Kitchen,
        recipe: &'a Recipe,
        table: &'a SourceTable,
        version: &str,
        package_dir: &Path,
    ) -> Result<Self> {
        let source = table.source(version)?;
        let patches = table.patches(version)?;
        let major_minor = version_major_minor(version)?;

        Ok(Self {
            kitchen,
            recipe,
            table,
            version: version.to_string(),
            major_minor,
            source,
            patches,
            layout: PackageLayout::new(package_dir),
            build_dir: None,
            stage: CookStage::Uninitialized,
            configured: None,
            log: String::new(),
            warnings: Vec::new(),
        })
    }

    pub fn stage(&self) -> CookStage {
        self.stage
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn layout(&self) -> &PackageLayout {
        &self.layout
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    fn platform(&self) -> &dyn HostPlatform {
        self.kitchen.platform.as_ref()
    }

    /// Root of the temporary build directory
    pub fn build_root(&self) -> Result<&Path> {
        self.build_dir
            .as_ref()
            .map(TempDir::path)
            .ok_or_else(|| Error::InvalidStage {
                step: "build directory lookup",
                actual: self.stage.to_string(),
            })
    }

    /// Directory holding the extracted (and patched) sources
    pub fn source_dir(&self) -> Result<PathBuf> {
        Ok(self.build_root()?.join(SOURCE_SUBFOLDER))
    }

    fn expect_stage(&self, step: &'static str, expected: CookStage) -> Result<()> {
        if self.stage != expected {
            return Err(Error::InvalidStage {
                step,
                actual: self.stage.to_string(),
            });
        }
        Ok(())
    }

    /// Source step: fetch, unpack and rename to `source_subfolder`
    pub fn source(&mut self) -> Result<()> {
        self.expect_stage("source", CookStage::Uninitialized)?;

        let archive = self.kitchen.fetcher.fetch(self.source)?;
        self.log_line(&format!("Fetched source: {}", archive.display()));

        let build_dir = self.kitchen.create_build_dir()?;
        let root = build_dir.path().to_path_buf();
        self.build_dir = Some(build_dir);

        self.kitchen.fetcher.unpack(&archive, &root)?;

        let extracted = root.join(self.recipe.archive_dir(&self.version));
        if !extracted.is_dir() {
            return Err(Error::NotFound(format!(
                "Archive did not contain {}",
                self.recipe.archive_dir(&self.version)
            )));
        }
        let source_dir = root.join(SOURCE_SUBFOLDER);
        fs::rename(&extracted, &source_dir)?;
        debug!("Source directory: {}", source_dir.display());
        self.log_line(&format!("Extracted source to {}", source_dir.display()));

        self.stage = CookStage::Sourced;
        Ok(())
    }

    /// Patch step: apply the version's patches in order
    pub fn patch(&mut self) -> Result<()> {
        self.expect_stage("patch", CookStage::Sourced)?;

        let root = self.build_root()?.to_path_buf();
        let source_dir = self.source_dir()?;

        for patch in self.patches {
            let patch_path = self.table.patch_path(patch);
            if !patch_path.exists() {
                return Err(Error::NotFound(format!(
                    "Patch file not found: {}",
                    patch_path.display()
                )));
            }

            let base_dir = match &patch.base_path {
                Some(base) => root.join(base),
                None => source_dir.clone(),
            };

            info!("Applying patch: {}", patch.patch_file);
            self.kitchen
                .fetcher
                .apply_patch(&base_dir, &patch_path, patch.strip)?;
            self.log_line(&format!("Applied patch: {}", patch.patch_file));
        }

        self.stage = CookStage::Patched;
        Ok(())
    }

    /// Configure step
    ///
    /// Runs `configure --datarootdir=<pkg>/bin/share --prefix=<pkg>` once.
    /// Any later call returns the same handle.
    pub fn configure(&mut self) -> Result<Arc<ConfiguredToolchain>> {
        if let Some(configured) = &self.configured {
            return Ok(Arc::clone(configured));
        }
        self.expect_stage("configure", CookStage::Patched)?;

        let platform = self.platform();
        let datarootdir = platform.toolchain_path(&self.layout.datarootdir());
        let prefix = platform.toolchain_path(self.layout.root());
        let args = vec![
            format!("--datarootdir={}", datarootdir),
            format!("--prefix={}", prefix),
        ];

        let source_dir = self.source_dir()?;
        let build_dir = self.build_root()?.join("build");
        fs::create_dir_all(&build_dir)?;

        let (configured, output) = self
            .kitchen
            .toolchain
            .configure(&source_dir, &build_dir, &args)?;
        self.log_build_output("configure", &output);

        let configured = Arc::new(configured);
        self.configured = Some(Arc::clone(&configured));
        self.stage = CookStage::Configured;
        Ok(configured)
    }

    /// Build step: `make`
    pub fn build(&mut self, configured: &ConfiguredToolchain) -> Result<()> {
        self.expect_stage("build", CookStage::Configured)?;

        let output = self.kitchen.toolchain.make(configured)?;
        self.log_build_output("make", &output);

        self.stage = CookStage::Built;
        Ok(())
    }

    /// Package step: licenses, `make install`, pruning and suffixing
    pub fn package(&mut self, configured: &ConfiguredToolchain) -> Result<()> {
        self.expect_stage("package", CookStage::Built)?;

        let copied = self.copy_licenses()?;
        self.log_line(&format!("Copied {} license file(s)", copied));
        if copied == 0 {
            let message = format!("No license files matched {}", self.recipe.layout.license_files);
            self.warn(message);
        }

        let output = self.kitchen.toolchain.install(configured)?;
        self.log_build_output("install", &output);

        self.prune_datarootdir()?;

        if self.platform().is_windows() {
            let (renamed, skipped) = self.suffix_executables()?;
            self.log_line(&format!("Added .exe suffix to {} file(s)", renamed));
            for name in skipped {
                self.warn(format!("{} already carries the .exe suffix", name));
            }
        }

        self.stage = CookStage::Packaged;
        Ok(())
    }

    /// Package-info step: compute the exported environment
    pub fn package_info(&mut self) -> Result<EnvironmentExports> {
        self.expect_stage("package_info", CookStage::Packaged)?;

        let exports = automake_exports(&self.layout, &self.version, self.platform())?;
        debug!(
            "Perl library dir for {}: automake-{}",
            self.version, self.major_minor
        );

        self.stage = CookStage::Published;
        Ok(exports)
    }

    /// Hand over the build directory, keeping it on disk
    pub(super) fn keep_build_dir(&mut self) -> Option<PathBuf> {
        self.build_dir.take().map(TempDir::keep)
    }

    fn copy_licenses(&self) -> Result<usize> {
        let source_dir = self.source_dir()?;
        let pattern = source_dir.join(&self.recipe.layout.license_files);
        let pattern = pattern.to_string_lossy();

        let licenses_dir = self.layout.licenses_dir();
        fs::create_dir_all(&licenses_dir)?;

        let matches = glob::glob(&pattern)
            .map_err(|e| Error::ParseError(format!("Invalid license pattern: {}", e)))?;

        let mut copied = 0;
        for entry in matches {
            let path = entry.map_err(|e| Error::IoError(e.to_string()))?;
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name() {
                fs::copy(&path, licenses_dir.join(name))?;
                copied += 1;
            }
        }

        Ok(copied)
    }

    fn prune_datarootdir(&self) -> Result<()> {
        let datarootdir = self.layout.datarootdir();
        for name in &self.recipe.layout.prune {
            let dir = datarootdir.join(name);
            if dir.exists() {
                debug!("Removing {}", dir.display());
                fs::remove_dir_all(&dir)?;
            }
        }
        Ok(())
    }

    /// Append `.exe` to every regular file directly under `bin/`
    ///
    /// Returns the number of renamed files and the names of files that
    /// already carried the suffix.
    fn suffix_executables(&self) -> Result<(usize, Vec<String>)> {
        let bin_dir = self.layout.bin_dir();
        if !bin_dir.is_dir() {
            return Ok((0, Vec::new()));
        }

        let suffix = self.platform().exe_suffix();
        let mut renamed = 0;
        let mut skipped = Vec::new();

        // Snapshot first so renamed files are not visited again
        let mut paths = Vec::new();
        for entry in fs::read_dir(&bin_dir)? {
            paths.push(entry?.path());
        }

        for path in paths {
            if !path.is_file() {
                continue;
            }

            let name = path.to_string_lossy();
            if name.ends_with(suffix) {
                debug!("{} already carries {}", path.display(), suffix);
                if let Some(file_name) = path.file_name() {
                    skipped.push(file_name.to_string_lossy().into_owned());
                }
                continue;
            }

            let target = PathBuf::from(format!("{}{}", name, suffix));
            fs::rename(&path, &target)?;
            renamed += 1;
        }

        skipped.sort();
        Ok((renamed, skipped))
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.log_line(&format!("WARNING: {}", message));
        self.warnings.push(message);
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }

    /// Log toolchain output with a phase header
    fn log_build_output(&mut self, phase: &str, output: &CommandOutput) {
        self.log_line(&format!("=== {} ===", phase));
        if !output.stdout.is_empty() {
            self.log.push_str(&output.stdout);
            self.log.push('\n');
        }
        if !output.stderr.is_empty() {
            self.log.push_str(&output.stderr);
            self.log.push('\n');
        }
    }
}
