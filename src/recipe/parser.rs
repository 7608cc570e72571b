// src/recipe/parser.rs

//! Recipe and source table parsing

use crate::error::{Error, Result};
use crate::hash::is_sha256_hex;
use crate::recipe::data::SourceTable;
use crate::recipe::format::Recipe;
use crate::version::version_major_minor;
use std::path::Path;

/// File name of the recipe inside a recipe directory
pub const RECIPE_FILE: &str = "recipe.toml";

/// File name of the source table inside a recipe directory
pub const SOURCES_FILE: &str = "sources.toml";

/// Recipe shipped with the kitchen
pub const BUILTIN_RECIPE: &str = include_str!("../../recipes/automake/recipe.toml");

/// Source table shipped with the kitchen
pub const BUILTIN_SOURCES: &str = include_str!("../../recipes/automake/sources.toml");

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read recipe file: {}", e)))?;

    parse_recipe(&content)
}

/// Parse a source table from a TOML string
pub fn parse_source_table(content: &str) -> Result<SourceTable> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid source table: {}", e)))
}

/// Parse a source table from a file
///
/// Relative patch paths resolve against the file's directory.
pub fn parse_source_table_file(path: &Path) -> Result<SourceTable> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read source table: {}", e)))?;

    let mut table = parse_source_table(&content)?;
    table.base_dir = path.parent().map(Path::to_path_buf);
    Ok(table)
}

/// Load `recipe.toml` and `sources.toml` from a recipe directory
pub fn load_recipe_dir(dir: &Path) -> Result<(Recipe, SourceTable)> {
    let recipe = parse_recipe_file(&dir.join(RECIPE_FILE))?;
    let table = parse_source_table_file(&dir.join(SOURCES_FILE))?;
    Ok((recipe, table))
}

/// The recipe and source table embedded in the binary
pub fn builtin_recipe() -> Result<(Recipe, SourceTable)> {
    Ok((parse_recipe(BUILTIN_RECIPE)?, parse_source_table(BUILTIN_SOURCES)?))
}

/// Validate a recipe for completeness and correctness
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::ParseError("Recipe package name cannot be empty".to_string()));
    }

    if glob::Pattern::new(&recipe.layout.license_files).is_err() {
        return Err(Error::ParseError(format!(
            "Invalid license file pattern: {}",
            recipe.layout.license_files
        )));
    }

    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    if recipe.package.license.is_empty() {
        warnings.push("Missing package license".to_string());
    }

    Ok(warnings)
}

/// Validate a source table
pub fn validate_source_table(table: &SourceTable) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if table.sources.is_empty() {
        warnings.push("Source table has no versions".to_string());
    }

    for (version, entry) in &table.sources {
        version_major_minor(version)?;

        if !is_sha256_hex(&entry.sha256) {
            return Err(Error::ParseError(format!(
                "Invalid sha256 for version {}: {}",
                version, entry.sha256
            )));
        }

        if entry.urls().is_empty() {
            return Err(Error::ParseError(format!(
                "Version {} has no source URL",
                version
            )));
        }

        if !table.patches.contains_key(version) {
            warnings.push(format!("Version {} has no patches entry", version));
        }
    }

    for version in table.patches.keys() {
        if !table.sources.contains_key(version) {
            warnings.push(format!("Patches listed for unknown version {}", version));
        }
    }

    Ok(warnings)
}
