// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe directory
fn recipe_dir_arg() -> Arg {
    Arg::new("recipe_dir")
        .short('r')
        .long("recipe-dir")
        .value_name("DIR")
        .help("Recipe directory holding recipe.toml and sources.toml")
}

/// Common argument: source cache directory
fn source_cache_arg() -> Arg {
    Arg::new("source_cache")
        .long("source-cache")
        .value_name("DIR")
        .help("Directory for caching downloaded sources")
}

/// Common build host overrides
fn host_args() -> [Arg; 3] {
    [
        Arg::new("os").long("os").help("Build host operating system"),
        Arg::new("arch").long("arch").help("Build host architecture"),
        Arg::new("subsystem")
            .long("subsystem")
            .value_parser(["msys", "msys2", "cygwin", "wsl"])
            .help("POSIX subsystem on Windows hosts"),
    ]
}

fn build_cli() -> Command {
    Command::new("automake-kitchen")
        .version(env!("CARGO_PKG_VERSION"))
        .author("automake-kitchen Contributors")
        .about("Cook and package GNU Automake from source")
        .subcommand_required(true)
        .subcommand(
            Command::new("cook")
                .about("Build and package one version of the recipe")
                .arg(Arg::new("version").required(true).help("Version to cook"))
                .arg(recipe_dir_arg())
                .args(host_args())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .default_value(".")
                        .help("Output directory for the package and its metadata"),
                )
                .arg(source_cache_arg())
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help("Number of parallel make jobs"),
                )
                .arg(
                    Arg::new("keep_builddir")
                        .long("keep-builddir")
                        .action(clap::ArgAction::SetTrue)
                        .help("Keep the build directory after completion"),
                ),
        )
        .subcommand(
            Command::new("fetch")
                .about("Download and verify sources without building")
                .arg(Arg::new("version").required(true).help("Version to fetch"))
                .arg(recipe_dir_arg())
                .arg(source_cache_arg()),
        )
        .subcommand(
            Command::new("env")
                .about("Print the environment a cooked package exports")
                .arg(Arg::new("version").required(true).help("Version of the cooked package"))
                .arg(
                    Arg::new("package_dir")
                        .short('p')
                        .long("package-dir")
                        .required(true)
                        .help("Root directory of the cooked package"),
                )
                .args(host_args())
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_parser(["shell", "json"])
                        .default_value("shell")
                        .help("Output format"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a recipe and its source table")
                .arg(recipe_dir_arg()),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("automake-kitchen.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
