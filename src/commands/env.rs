// src/commands/env.rs

//! Env command - print what a cooked package exports

use super::host_settings;
use crate::cli::{EnvFormat, HostArgs};
use anyhow::{Context, Result};
use automake_kitchen::platform::host_platform;
use automake_kitchen::recipe::{automake_exports, PackageLayout};
use std::path::Path;

pub fn cmd_env(version: &str, package_dir: &str, host_args: &HostArgs, format: EnvFormat) -> Result<()> {
    let package_dir = Path::new(package_dir);
    if !package_dir.is_dir() {
        anyhow::bail!("Package directory not found: {}", package_dir.display());
    }

    let (settings, subsystem) = host_settings(host_args)?;
    let platform = host_platform(&settings, subsystem);
    let layout = PackageLayout::new(package_dir);

    let exports = automake_exports(&layout, version, platform.as_ref())
        .with_context(|| format!("Failed to compute environment for version {}", version))?;

    match format {
        EnvFormat::Shell => print!("{}", exports.to_shell()),
        EnvFormat::Json => println!("{}", serde_json::to_string_pretty(&exports)?),
    }

    Ok(())
}
