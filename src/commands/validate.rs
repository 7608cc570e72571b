// src/commands/validate.rs

//! Validate command - check a recipe without cooking

use super::load_recipe;
use crate::cli::RecipeArgs;
use anyhow::{Context, Result};
use automake_kitchen::recipe::{validate_recipe, validate_source_table};

pub fn cmd_validate(recipe_args: &RecipeArgs) -> Result<()> {
    let (recipe, table) = load_recipe(recipe_args)?;

    println!("Recipe: {}", recipe.package.name);

    let mut warnings = validate_recipe(&recipe).context("Recipe validation failed")?;
    warnings.extend(validate_source_table(&table).context("Source table validation failed")?);

    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    println!("Versions:");
    for version in table.versions() {
        let patches = table.patches(version).map(<[_]>::len).unwrap_or(0);
        println!("  - {} ({} patch(es))", version, patches);
    }

    println!("Recipe validation passed");
    if warnings.is_empty() {
        println!("[OK] No issues found");
    } else {
        println!("[OK] {} warning(s)", warnings.len());
    }

    Ok(())
}
