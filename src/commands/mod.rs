// src/commands/mod.rs
//! Command handlers for the automake-kitchen CLI

mod cook;
mod env;
mod validate;

pub use cook::{cmd_cook, cmd_fetch};
pub use env::cmd_env;
pub use validate::cmd_validate;

use crate::cli::{HostArgs, RecipeArgs};
use anyhow::{Context, Result};
use automake_kitchen::platform::{Arch, BuildSettings, Os, PosixSubsystem};
use automake_kitchen::recipe::{builtin_recipe, load_recipe_dir, Recipe, SourceTable};
use std::path::Path;

/// Load the recipe named on the command line, or the built-in one
pub(crate) fn load_recipe(args: &RecipeArgs) -> Result<(Recipe, SourceTable)> {
    match &args.recipe_dir {
        Some(dir) => {
            println!("Reading recipe: {}", dir);
            load_recipe_dir(Path::new(dir))
                .with_context(|| format!("Failed to load recipe from {}", dir))
        }
        None => builtin_recipe().context("Built-in recipe is invalid"),
    }
}

/// Build settings and Windows subsystem, honoring command-line overrides
pub(crate) fn host_settings(args: &HostArgs) -> Result<(BuildSettings, Option<PosixSubsystem>)> {
    let os = match &args.os {
        Some(os) => os.parse::<Os>()?,
        None => Os::current(),
    };
    let arch = match &args.arch {
        Some(arch) => arch.parse::<Arch>()?,
        None => Arch::current(),
    };
    let subsystem = match &args.subsystem {
        Some(s) => Some(s.parse::<PosixSubsystem>()?),
        None => PosixSubsystem::detect(),
    };

    Ok((BuildSettings::new(os, arch), subsystem))
}
