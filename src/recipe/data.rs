// src/recipe/data.rs

//! Per-version source data
//!
//! The source table maps each supported version to its archive and the
//! ordered patches to apply on top of it:
//!
//! ```toml
//! [sources."1.16.1"]
//! url = "https://ftp.gnu.org/gnu/automake/automake-1.16.1.tar.gz"
//! sha256 = "608a97523f97db32f1f5d5615c98ca69326ced2054c9f82e65bade7fc4c9dea8"
//!
//! [[patches."1.16.1"]]
//! patch_file = "patches/0001-fix.patch"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Sources and patches keyed by version
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceTable {
    #[serde(default)]
    pub sources: BTreeMap<String, SourceEntry>,

    #[serde(default)]
    pub patches: BTreeMap<String, Vec<PatchInfo>>,

    /// Directory that relative patch paths are resolved against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl SourceTable {
    /// Source archive for `version`
    pub fn source(&self, version: &str) -> Result<&SourceEntry> {
        self.sources.get(version).ok_or_else(|| Error::MissingVersion {
            kind: "source",
            version: version.to_string(),
        })
    }

    /// Ordered patches for `version`
    ///
    /// A version listed without a `patches` entry is an error; use an empty
    /// list for versions that need no patching.
    pub fn patches(&self, version: &str) -> Result<&[PatchInfo]> {
        self.patches
            .get(version)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingVersion {
                kind: "patches",
                version: version.to_string(),
            })
    }

    /// All versions that have a source entry
    pub fn versions(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    /// Resolve a patch file against the table's base directory
    pub fn patch_path(&self, patch: &PatchInfo) -> PathBuf {
        let file = Path::new(&patch.patch_file);
        match &self.base_dir {
            Some(base) if file.is_relative() => base.join(file),
            _ => file.to_path_buf(),
        }
    }
}

/// One or several mirror URLs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SourceUrl {
    Single(String),
    Mirrors(Vec<String>),
}

/// A source archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Download location(s), tried in order
    pub url: SourceUrl,

    /// SHA-256 of the archive
    pub sha256: String,
}

impl SourceEntry {
    pub fn urls(&self) -> Vec<&str> {
        match &self.url {
            SourceUrl::Single(url) => vec![url.as_str()],
            SourceUrl::Mirrors(urls) => urls.iter().map(String::as_str).collect(),
        }
    }

    /// File name of the archive, taken from the first URL
    pub fn filename(&self) -> String {
        self.urls()
            .first()
            .and_then(|url| url.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("source.tar.gz")
            .to_string()
    }
}

/// A patch applied before configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchInfo {
    /// Patch file path, relative to the source table's directory
    pub patch_file: String,

    /// Directory (relative to the build root) the patch applies in;
    /// defaults to the extracted source directory
    #[serde(default)]
    pub base_path: Option<String>,

    /// Strip level for patch (default: 1)
    #[serde(default = "default_strip")]
    pub strip: u32,
}

fn default_strip() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
[sources."1.16.1"]
url = "https://ftp.gnu.org/gnu/automake/automake-1.16.1.tar.gz"
sha256 = "608a97523f97db32f1f5d5615c98ca69326ced2054c9f82e65bade7fc4c9dea8"

[sources."1.16.2"]
url = ["https://mirror.example/automake-1.16.2.tar.xz", "https://ftp.gnu.org/gnu/automake/automake-1.16.2.tar.xz"]
sha256 = "ccc459de3d710e066ab9e12d2f119bd164a08c9341ca24ba22c9adaa179eedd0"

[patches]
"1.16.2" = []

[[patches."1.16.1"]]
patch_file = "patches/0001-first.patch"

[[patches."1.16.1"]]
patch_file = "patches/0002-second.patch"
base_path = "source_subfolder/lib"
strip = 0
"#;

    fn table() -> SourceTable {
        toml::from_str(TABLE).unwrap()
    }

    #[test]
    fn test_source_lookup() {
        let table = table();
        let entry = table.source("1.16.1").unwrap();
        assert_eq!(entry.urls().len(), 1);
        assert_eq!(entry.filename(), "automake-1.16.1.tar.gz");
        assert_eq!(table.versions(), vec!["1.16.1", "1.16.2"]);
    }

    #[test]
    fn test_mirror_urls() {
        let table = table();
        let entry = table.source("1.16.2").unwrap();
        assert_eq!(entry.urls().len(), 2);
        assert_eq!(entry.filename(), "automake-1.16.2.tar.xz");
    }

    #[test]
    fn test_patches_keep_order_and_defaults() {
        let table = table();
        let patches = table.patches("1.16.1").unwrap();
        assert_eq!(patches.len(), 2);
        assert_eq!(patches[0].patch_file, "patches/0001-first.patch");
        assert_eq!(patches[0].strip, 1);
        assert!(patches[0].base_path.is_none());
        assert_eq!(patches[1].strip, 0);
        assert!(table.patches("1.16.2").unwrap().is_empty());
    }

    #[test]
    fn test_missing_version() {
        let table = table();
        assert!(matches!(
            table.source("1.15"),
            Err(Error::MissingVersion { kind: "source", .. })
        ));
        assert!(matches!(
            table.patches("1.15"),
            Err(Error::MissingVersion { kind: "patches", .. })
        ));
    }

    #[test]
    fn test_patch_path_resolution() {
        let mut table = table();
        let patch = table.patches("1.16.1").unwrap()[0].clone();
        assert_eq!(table.patch_path(&patch), PathBuf::from("patches/0001-first.patch"));

        table.base_dir = Some(PathBuf::from("/recipes/automake"));
        assert_eq!(
            table.patch_path(&patch),
            PathBuf::from("/recipes/automake/patches/0001-first.patch")
        );
    }
}
