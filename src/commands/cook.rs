// src/commands/cook.rs

//! Cook command - build Automake from its recipe

use super::{host_settings, load_recipe};
use crate::cli::{HostArgs, RecipeArgs};
use anyhow::{Context, Result};
use automake_kitchen::recipe::{validate_recipe, validate_source_table, Kitchen, KitchenConfig};
use std::path::{Path, PathBuf};
use tracing::info;

/// Cook one version of the recipe
///
/// # Arguments
/// * `version` - Version to cook
/// * `output_dir` - Directory receiving the package and its metadata
/// * `source_cache` - Directory for caching downloaded sources (None = default)
/// * `jobs` - Number of parallel build jobs (None = auto)
/// * `keep_builddir` - Keep build directory after completion
pub fn cmd_cook(
    version: &str,
    recipe_args: &RecipeArgs,
    host_args: &HostArgs,
    output_dir: &str,
    source_cache: Option<&str>,
    jobs: Option<u32>,
    keep_builddir: bool,
) -> Result<()> {
    let output_dir = Path::new(output_dir);
    let (recipe, table) = load_recipe(recipe_args)?;

    println!("Recipe: {} version {}", recipe.package.name, version);

    let mut warnings = validate_recipe(&recipe).context("Recipe validation failed")?;
    warnings.extend(validate_source_table(&table).context("Source table validation failed")?);
    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    let mut config = KitchenConfig::from_env();
    config.keep_builddir = keep_builddir;
    if let Some(cache) = source_cache {
        config.source_cache = PathBuf::from(cache);
    }
    if let Some(j) = jobs {
        config.jobs = j;
    }

    let (settings, subsystem) = host_settings(host_args)?;
    info!(
        "Build host: {} {} (subsystem: {:?})",
        settings.os_build, settings.arch_build, subsystem
    );

    let kitchen = Kitchen::for_settings(config, settings, subsystem);

    if kitchen.sources_cached(&table, version) {
        println!("  - Sources already cached (offline build possible)");
    }
    println!("Cooking with {} parallel jobs...", kitchen.config().jobs);

    let result = kitchen
        .cook(&recipe, &table, version, output_dir)
        .with_context(|| format!("Failed to cook {} {}", recipe.package.name, version))?;

    println!("\n[COMPLETE] Cooked: {}", result.package_dir.display());
    println!("Metadata: {}", result.metadata_path.display());

    for warning in &result.warnings {
        println!("Warning: {}", warning);
    }

    if let Some(build_dir) = &result.build_dir {
        println!("Build directory kept at: {}", build_dir.display());
    }

    println!("\nEnvironment:");
    print!("{}", result.exports.to_shell());

    Ok(())
}

/// Download and verify the sources of one version
pub fn cmd_fetch(version: &str, recipe_args: &RecipeArgs, source_cache: Option<&str>) -> Result<()> {
    let (recipe, table) = load_recipe(recipe_args)?;

    let mut config = KitchenConfig::from_env();
    if let Some(cache) = source_cache {
        config.source_cache = PathBuf::from(cache);
    }
    let kitchen = Kitchen::new(config);

    println!("Fetching sources for {} {}...", recipe.package.name, version);
    let archive = kitchen
        .fetch(&table, version)
        .with_context(|| format!("Failed to fetch sources for {} {}", recipe.package.name, version))?;

    println!("\n[COMPLETE] Fetched: {}", archive.display());

    if kitchen.sources_cached(&table, version) {
        println!("[OK] Sources are cached. Ready for offline build.");
    }

    Ok(())
}
