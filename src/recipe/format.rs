// src/recipe/format.rs

//! Recipe file format definitions
//!
//! A recipe carries the version-independent description of a package:
//! metadata, requirements and packaging rules. Versions and their sources
//! live in a separate [`SourceTable`](super::SourceTable).

use crate::error::{Error, Result};
use crate::platform::{BuildSettings, PosixSubsystem};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A complete recipe for building a package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Runtime and build-time requirements
    #[serde(default)]
    pub requirements: RequirementsSection,

    /// Packaging rules
    #[serde(default)]
    pub layout: LayoutSection,
}

impl Recipe {
    /// Requirements every build of this recipe needs
    pub fn requirements(&self) -> Vec<Requirement> {
        self.requirements.requires.clone()
    }

    /// Extra build-time requirements for the given build host
    ///
    /// A Windows host needs a POSIX shell to run `configure`. Unless the
    /// user points at one explicitly (`bash_override`) or MSYS2 is already
    /// present, the recipe's `windows_shell` package is required.
    pub fn build_requirements(
        &self,
        settings: &BuildSettings,
        subsystem: Option<PosixSubsystem>,
        bash_override: bool,
    ) -> Vec<Requirement> {
        let mut reqs = Vec::new();

        if settings.is_windows()
            && !bash_override
            && subsystem != Some(PosixSubsystem::Msys2)
            && let Some(shell) = &self.requirements.windows_shell
        {
            reqs.push(shell.clone());
        }

        reqs
    }

    /// Name of the top-level directory inside the source archive
    pub fn archive_dir(&self, version: &str) -> String {
        format!("{}-{}", self.package.name, version)
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,

    /// License identifiers (SPDX)
    #[serde(default)]
    pub license: Vec<String>,

    /// Search topics
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Requirements section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementsSection {
    /// Packages needed whenever this package is used
    #[serde(default)]
    pub requires: Vec<Requirement>,

    /// POSIX environment package required on Windows build hosts
    #[serde(default)]
    pub windows_shell: Option<Requirement>,
}

/// Packaging rules section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSection {
    /// Glob (relative to the source directory) selecting license files
    #[serde(default = "default_license_files")]
    pub license_files: String,

    /// Subdirectories of the data root that are not published
    #[serde(default = "default_prune")]
    pub prune: Vec<String>,
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            license_files: default_license_files(),
            prune: default_prune(),
        }
    }
}

fn default_license_files() -> String {
    "COPYING*".to_string()
}

fn default_prune() -> Vec<String> {
    vec!["info".to_string(), "man".to_string(), "doc".to_string()]
}

/// A `name/version` package reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Requirement {
    pub name: String,
    pub version: String,
}

impl Requirement {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for Requirement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                Ok(Self::new(name.trim(), version.trim()))
            }
            _ => Err(Error::ParseError(format!(
                "Invalid requirement '{}': expected name/version",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Requirement {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Requirement> for String {
    fn from(req: Requirement) -> Self {
        req.to_string()
    }
}
