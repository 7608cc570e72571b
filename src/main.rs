// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Cook {
            version,
            recipe,
            host,
            output,
            source_cache,
            jobs,
            keep_builddir,
        } => commands::cmd_cook(
            &version,
            &recipe,
            &host,
            &output,
            source_cache.as_deref(),
            jobs,
            keep_builddir,
        ),
        Commands::Fetch {
            version,
            recipe,
            source_cache,
        } => commands::cmd_fetch(&version, &recipe, source_cache.as_deref()),
        Commands::Env {
            version,
            package_dir,
            host,
            format,
        } => commands::cmd_env(&version, &package_dir, &host, format),
        Commands::Validate { recipe } => commands::cmd_validate(&recipe),
    }
}
