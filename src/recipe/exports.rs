// src/recipe/exports.rs

//! Environment exported to consumers of a published package

use crate::error::Result;
use crate::platform::HostPlatform;
use crate::recipe::layout::PackageLayout;
use crate::version::version_major_minor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

pub const ACLOCAL: &str = "ACLOCAL";
pub const AUTOMAKE: &str = "AUTOMAKE";
pub const AUTOMAKE_DATADIR: &str = "AUTOMAKE_DATADIR";
pub const AUTOMAKE_PERLLIBDIR: &str = "AUTOMAKE_PERLLIBDIR";

/// Environment variables a package publishes for downstream builds
///
/// `path` entries are appended to the consumer's `PATH`; `vars` are set
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentExports {
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
}

impl EnvironmentExports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_path(&mut self, entry: impl Into<String>) {
        self.path.push(entry.into());
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Render as POSIX shell `export` statements
    pub fn to_shell(&self) -> String {
        let mut out = String::new();

        if !self.path.is_empty() {
            let joined: Vec<String> = self.path.iter().map(|p| shell_escape(p)).collect();
            out.push_str(&format!(
                "export PATH=\"{}${{PATH:+:$PATH}}\"\n",
                joined.join(":")
            ));
        }

        for (name, value) in &self.vars {
            out.push_str(&format!("export {}=\"{}\"\n", name, shell_escape(value)));
        }

        out
    }
}

fn shell_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Compute the Automake environment for a package installed at `layout`
///
/// `PATH` receives the native `bin` directory; every variable is translated
/// to the toolchain path convention of the build host.
pub fn automake_exports(
    layout: &PackageLayout,
    version: &str,
    platform: &dyn HostPlatform,
) -> Result<EnvironmentExports> {
    let major_minor = version_major_minor(version)?;
    let bin_dir = layout.bin_dir();
    let mut exports = EnvironmentExports::new();

    let bin_path = bin_dir.to_string_lossy().into_owned();
    info!("Appending PATH env var with : {}", bin_path);
    exports.append_path(bin_path);

    let vars = [
        (ACLOCAL, platform.executable(&bin_dir, "aclocal")),
        (AUTOMAKE_DATADIR, layout.datarootdir()),
        (AUTOMAKE_PERLLIBDIR, layout.perllibdir(&major_minor)),
        (AUTOMAKE, platform.executable(&bin_dir, "automake")),
    ];

    for (name, path) in vars {
        let value = platform.toolchain_path(&path);
        info!("Setting {} to {}", name, value);
        exports.set(name, value);
    }

    Ok(exports)
}

/// Metadata written next to a published package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub os_build: String,
    pub arch_build: String,
    #[serde(default)]
    pub license: Vec<String>,
    #[serde(default)]
    pub requires: Vec<String>,
    pub env: EnvironmentExports,
}

impl PackageMetadata {
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{NativePlatform, PosixSubsystem, WindowsPlatform};

    #[test]
    fn test_native_exports() {
        let layout = PackageLayout::new("/pkg");
        let exports = automake_exports(&layout, "1.16.1", &NativePlatform).unwrap();

        assert_eq!(exports.path, vec!["/pkg/bin"]);
        assert_eq!(exports.get(ACLOCAL), Some("/pkg/bin/aclocal"));
        assert_eq!(exports.get(AUTOMAKE), Some("/pkg/bin/automake"));
        assert_eq!(exports.get(AUTOMAKE_DATADIR), Some("/pkg/bin/share"));
        assert_eq!(
            exports.get(AUTOMAKE_PERLLIBDIR),
            Some("/pkg/bin/share/automake-1.16")
        );
        assert_eq!(exports.vars.len(), 4);
    }

    #[test]
    fn test_windows_exports_are_translated() {
        let layout = PackageLayout::new(r"C:\Pkg");
        let platform = WindowsPlatform::new(PosixSubsystem::Msys2);
        let exports = automake_exports(&layout, "1.16.2", &platform).unwrap();

        assert_eq!(exports.get(ACLOCAL), Some("/c/pkg/bin/aclocal.exe"));
        assert_eq!(exports.get(AUTOMAKE), Some("/c/pkg/bin/automake.exe"));
        assert_eq!(exports.get(AUTOMAKE_DATADIR), Some("/c/pkg/bin/share"));
        assert_eq!(
            exports.get(AUTOMAKE_PERLLIBDIR),
            Some("/c/pkg/bin/share/automake-1.16")
        );
    }

    #[test]
    fn test_exports_reject_bad_version() {
        let layout = PackageLayout::new("/pkg");
        assert!(automake_exports(&layout, "1", &NativePlatform).is_err());
    }

    #[test]
    fn test_to_shell() {
        let mut exports = EnvironmentExports::new();
        exports.append_path("/pkg/bin");
        exports.set(AUTOMAKE, "/pkg/bin/automake");
        exports.set("WEIRD", "a\"b$c");

        let shell = exports.to_shell();
        assert!(shell.contains("export PATH=\"/pkg/bin${PATH:+:$PATH}\"\n"));
        assert!(shell.contains("export AUTOMAKE=\"/pkg/bin/automake\"\n"));
        assert!(shell.contains("export WEIRD=\"a\\\"b\\$c\"\n"));
    }

    #[test]
    fn test_metadata_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("automake-1.16.1.json");

        let mut env = EnvironmentExports::new();
        env.set(ACLOCAL, "/pkg/bin/aclocal");
        let metadata = PackageMetadata {
            name: "automake".to_string(),
            version: "1.16.1".to_string(),
            os_build: "Linux".to_string(),
            arch_build: "x86_64".to_string(),
            license: vec!["GPL-2.0-or-later".to_string()],
            requires: vec!["autoconf/2.69".to_string()],
            env,
        };
        metadata.write(&path).unwrap();

        let loaded = PackageMetadata::read(&path).unwrap();
        assert_eq!(loaded.env, metadata.env);
        assert_eq!(loaded.requires, metadata.requires);
    }
}
