// src/lib.rs

//! Automake Kitchen
//!
//! Cooks GNU Automake from source and publishes it as a relocatable
//! package with the environment a consumer needs to use it.
//!
//! # Architecture
//!
//! - Recipes: package metadata plus a per-version source table
//! - Kitchen: fetcher, toolchain runner and host platform adapter
//! - Cook: an ordered state machine (source, patch, configure, build,
//!   package, package_info)
//! - Exports: `PATH`, `ACLOCAL`, `AUTOMAKE` and the Automake data dirs,
//!   translated for the build host's POSIX subsystem

mod error;
pub mod hash;
pub mod platform;
pub mod recipe;
pub mod version;

pub use error::{Error, Result};
pub use platform::{BuildSettings, HostPlatform, NativePlatform, PosixSubsystem, WindowsPlatform};
pub use recipe::{
    Cook, CookResult, CookStage, EnvironmentExports, Kitchen, KitchenConfig, Recipe, SourceTable,
};
pub use version::{version_major_minor, MajorMinor};
