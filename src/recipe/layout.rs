// src/recipe/layout.rs

//! On-disk layout of sources and published packages

use std::path::{Path, PathBuf};

/// Well-known directory the extracted sources are renamed to
pub const SOURCE_SUBFOLDER: &str = "source_subfolder";

/// Directory receiving copied license files
pub const LICENSES_DIR: &str = "licenses";

/// Layout of an installed package
///
/// ```text
/// <root>/
///   bin/                          executables
///   bin/share/                    data root (--datarootdir)
///   bin/share/automake-X.Y/       Perl modules (AUTOMAKE_PERLLIBDIR)
///   licenses/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    root: PathBuf,
}

impl PackageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Install prefix (`--prefix`)
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Data root directory (`--datarootdir`)
    pub fn datarootdir(&self) -> PathBuf {
        self.bin_dir().join("share")
    }

    /// Versioned Perl library directory under the data root
    pub fn perllibdir(&self, major_minor: &str) -> PathBuf {
        self.datarootdir().join(format!("automake-{}", major_minor))
    }

    pub fn licenses_dir(&self) -> PathBuf {
        self.root.join(LICENSES_DIR)
    }
}
