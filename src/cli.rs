// src/cli.rs
//! CLI definitions for automake-kitchen
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "automake-kitchen")]
#[command(author = "automake-kitchen Contributors")]
#[command(version)]
#[command(about = "Cook and package GNU Automake from source", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the recipe comes from
#[derive(Args, Debug, Clone)]
pub struct RecipeArgs {
    /// Recipe directory holding recipe.toml and sources.toml
    /// (default: the built-in Automake recipe)
    #[arg(short, long)]
    pub recipe_dir: Option<String>,
}

/// Build host overrides
#[derive(Args, Debug, Clone)]
pub struct HostArgs {
    /// Build host operating system (default: current host)
    #[arg(long)]
    pub os: Option<String>,

    /// Build host architecture (default: current host)
    #[arg(long)]
    pub arch: Option<String>,

    /// POSIX subsystem on Windows hosts: msys, msys2, cygwin or wsl
    /// (default: detected)
    #[arg(long)]
    pub subsystem: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and package one version of the recipe
    Cook {
        /// Version to cook (e.g. 1.16.1)
        version: String,

        #[command(flatten)]
        recipe: RecipeArgs,

        #[command(flatten)]
        host: HostArgs,

        /// Output directory for the package and its metadata
        #[arg(short, long, default_value = ".")]
        output: String,

        /// Directory for caching downloaded sources
        #[arg(long)]
        source_cache: Option<String>,

        /// Number of parallel make jobs (default: CPU count)
        #[arg(short, long)]
        jobs: Option<u32>,

        /// Keep the build directory after completion
        #[arg(long)]
        keep_builddir: bool,
    },

    /// Download and verify sources without building
    Fetch {
        /// Version whose sources should be fetched
        version: String,

        #[command(flatten)]
        recipe: RecipeArgs,

        /// Directory for caching downloaded sources
        #[arg(long)]
        source_cache: Option<String>,
    },

    /// Print the environment a cooked package exports
    Env {
        /// Version of the cooked package
        version: String,

        /// Root directory of the cooked package
        #[arg(short, long)]
        package_dir: String,

        #[command(flatten)]
        host: HostArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = EnvFormat::Shell)]
        format: EnvFormat,
    },

    /// Validate a recipe and its source table
    Validate {
        #[command(flatten)]
        recipe: RecipeArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvFormat {
    /// `export` lines for a POSIX shell
    Shell,
    /// JSON object
    Json,
}
