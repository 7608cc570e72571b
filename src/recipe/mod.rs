// src/recipe/mod.rs

//! Recipe system for building Automake from source
//!
//! A recipe is split in two:
//! - `recipe.toml`: package metadata, requirements and package layout
//! - `sources.toml`: per-version source archives, checksums and patches
//!
//! # Culinary Terminology
//!
//! - **Recipe**: The build specification (like a recipe card)
//! - **Cook**: Build and package one version from a recipe
//! - **Kitchen**: The build environment (fetcher, toolchain, platform)
//! - **Ingredients**: Source archives and patches
//!
//! # Example Source Table
//!
//! ```toml
//! [sources."1.16.1"]
//! url = "https://ftp.gnu.org/gnu/automake/automake-1.16.1.tar.gz"
//! sha256 = "608a97523f97db32f1f5d5615c98ca69326ced2054c9f82e65bade7fc4c9dea8"
//!
//! [patches]
//! "1.16.1" = [{ patch_file = "patches/0001-fix.patch", strip = 1 }]
//! ```

pub mod data;
pub mod exports;
pub mod format;
pub mod kitchen;
pub mod layout;
pub mod parser;

pub use data::{PatchInfo, SourceEntry, SourceTable, SourceUrl};
pub use exports::{automake_exports, EnvironmentExports, PackageMetadata};
pub use format::{Recipe, Requirement};
pub use kitchen::{
    ArchiveFetcher, Autotools, ConfiguredToolchain, Cook, CookResult, CookStage, Kitchen,
    KitchenConfig, RequirementResolver, SourceFetcher, ToolchainRunner,
};
pub use layout::PackageLayout;
pub use parser::{
    builtin_recipe, load_recipe_dir, parse_recipe, parse_recipe_file, parse_source_table,
    validate_recipe, validate_source_table,
};
