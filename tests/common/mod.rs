// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use automake_kitchen::hash::sha256;
use automake_kitchen::recipe::kitchen::{CommandOutput, ConfiguredToolchain, ToolchainRunner};
use automake_kitchen::recipe::parser::parse_source_table_file;
use automake_kitchen::recipe::{Kitchen, KitchenConfig, SourceTable};
use automake_kitchen::{BuildSettings, PosixSubsystem, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A source table backed by a local archive.
///
/// Keep `dir` alive for as long as the table is used.
pub struct SourceFixture {
    pub dir: TempDir,
    pub archive: PathBuf,
    pub table: SourceTable,
}

impl SourceFixture {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("out")
    }

    pub fn package_dir(&self, version: &str) -> PathBuf {
        self.output_dir().join(format!("automake-{}", version))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root().join("cache")
    }
}

/// Write `automake-<version>.tar.gz` holding a minimal source tree.
fn write_source_archive(path: &Path, version: &str) {
    let top = format!("automake-{}", version);
    let files: [(&str, &[u8]); 4] = [
        ("COPYING", b"GNU GENERAL PUBLIC LICENSE\n"),
        ("COPYING.LIB", b"GNU LESSER GENERAL PUBLIC LICENSE\n"),
        ("README", b"original\n"),
        ("configure", b"#!/bin/sh\nexit 0\n"),
    ];

    let file = fs::File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(if name == "configure" { 0o755 } else { 0o644 });
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{}/{}", top, name), data)
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

/// Create a source table with one version and an optional patch.
pub fn source_fixture(version: &str, patch: Option<&str>) -> SourceFixture {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join(format!("automake-{}.tar.gz", version));
    write_source_archive(&archive, version);
    let checksum = sha256(&fs::read(&archive).unwrap());

    let patches = match patch {
        Some(text) => {
            fs::create_dir_all(dir.path().join("patches")).unwrap();
            fs::write(dir.path().join("patches/0001-readme.patch"), text).unwrap();
            r#"[{ patch_file = "patches/0001-readme.patch", strip = 1 }]"#.to_string()
        }
        None => "[]".to_string(),
    };

    let toml = format!(
        "[sources.\"{version}\"]\nurl = \"file://{url}\"\nsha256 = \"{checksum}\"\n\n[patches]\n\"{version}\" = {patches}\n",
        url = archive.display(),
    );
    let table_path = dir.path().join("sources.toml");
    fs::write(&table_path, toml).unwrap();
    let table = parse_source_table_file(&table_path).unwrap();

    SourceFixture {
        dir,
        archive,
        table,
    }
}

/// Kitchen configuration rooted inside a fixture.
pub fn test_config(fixture: &SourceFixture) -> KitchenConfig {
    KitchenConfig {
        source_cache: fixture.cache_dir(),
        build_root: Some(fixture.root().join("build")),
        jobs: 1,
        ..Default::default()
    }
}

/// Kitchen with a recording toolchain, for the given build host.
pub fn test_kitchen(
    fixture: &SourceFixture,
    settings: BuildSettings,
    subsystem: Option<PosixSubsystem>,
    toolchain: Arc<RecordingToolchain>,
) -> Kitchen {
    let mut kitchen = Kitchen::for_settings(test_config(fixture), settings, subsystem);
    kitchen.set_toolchain(toolchain);
    kitchen
}

/// Toolchain that records calls and fakes `make install`.
///
/// Install lays out what a real Automake install produces under the
/// package directory, including the documentation directories that the
/// package step prunes.
pub struct RecordingToolchain {
    package_dir: PathBuf,
    major_minor: String,
    extra_bin: Vec<String>,
    pub calls: Mutex<Vec<String>>,
    pub configure_args: Mutex<Vec<Vec<String>>>,
}

impl RecordingToolchain {
    pub fn new(package_dir: impl Into<PathBuf>, major_minor: &str) -> Self {
        Self {
            package_dir: package_dir.into(),
            major_minor: major_minor.to_string(),
            extra_bin: Vec::new(),
            calls: Mutex::new(Vec::new()),
            configure_args: Mutex::new(Vec::new()),
        }
    }

    /// Also install `name` into `bin/`
    pub fn with_bin(mut self, name: &str) -> Self {
        self.extra_bin.push(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ToolchainRunner for RecordingToolchain {
    fn configure(
        &self,
        configure_dir: &Path,
        build_dir: &Path,
        args: &[String],
    ) -> Result<(ConfiguredToolchain, CommandOutput)> {
        self.calls.lock().unwrap().push("configure".to_string());
        self.configure_args.lock().unwrap().push(args.to_vec());
        Ok((
            ConfiguredToolchain {
                configure_dir: configure_dir.to_path_buf(),
                build_dir: build_dir.to_path_buf(),
                args: args.to_vec(),
            },
            CommandOutput {
                stdout: "checking for perl... /usr/bin/perl".to_string(),
                stderr: String::new(),
            },
        ))
    }

    fn make(&self, _configured: &ConfiguredToolchain) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push("make".to_string());
        Ok(CommandOutput::default())
    }

    fn install(&self, _configured: &ConfiguredToolchain) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push("install".to_string());

        let bin = self.package_dir.join("bin");
        let share = bin.join("share");
        fs::create_dir_all(&bin)?;

        let mut tools = vec![
            "automake".to_string(),
            "aclocal".to_string(),
            format!("automake-{}", self.major_minor),
            format!("aclocal-{}", self.major_minor),
        ];
        tools.extend(self.extra_bin.iter().cloned());
        for tool in tools {
            fs::write(bin.join(tool), "#!/usr/bin/perl\n")?;
        }

        let perllib = share.join(format!("automake-{}", self.major_minor)).join("Automake");
        fs::create_dir_all(&perllib)?;
        fs::write(perllib.join("Config.pm"), "1;\n")?;
        fs::create_dir_all(share.join(format!("aclocal-{}", self.major_minor)))?;

        for doc in ["info", "man/man1", "doc/automake"] {
            let dir = share.join(doc);
            fs::create_dir_all(&dir)?;
            fs::write(dir.join("automake.txt"), "docs\n")?;
        }

        Ok(CommandOutput::default())
    }
}
