// src/platform/mod.rs

//! Build-host platform adapter
//!
//! Everything that differs between a Windows build host and the rest lives
//! here: the executable suffix of installed tools and the translation of
//! native paths into the convention understood by the POSIX shell that runs
//! `configure`/`make`. The kitchen picks one [`HostPlatform`] from the
//! [`BuildSettings`] and hands it to every cook step.

mod subsystem;

pub use subsystem::{unix_path, PosixSubsystem};

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Operating system of the build host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Macos,
    Windows,
    FreeBsd,
}

impl Os {
    /// The OS this binary was compiled for
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "macos" => Self::Macos,
            "freebsd" => Self::FreeBsd,
            _ => Self::Linux,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Macos => "Macos",
            Self::Windows => "Windows",
            Self::FreeBsd => "FreeBSD",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::Macos),
            "windows" => Ok(Self::Windows),
            "freebsd" => Ok(Self::FreeBsd),
            _ => Err(Error::ParseError(format!("Unknown build OS: {}", s))),
        }
    }
}

/// Architecture of the build host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86,
    X86_64,
    Armv7,
    Armv8,
}

impl Arch {
    /// The architecture this binary was compiled for
    pub fn current() -> Self {
        match std::env::consts::ARCH {
            "x86" => Self::X86,
            "arm" => Self::Armv7,
            "aarch64" => Self::Armv8,
            _ => Self::X86_64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Armv7 => "armv7",
            Self::Armv8 => "armv8",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "x86" | "i686" => Ok(Self::X86),
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "armv7" | "arm" => Ok(Self::Armv7),
            "armv8" | "aarch64" | "arm64" => Ok(Self::Armv8),
            _ => Err(Error::ParseError(format!("Unknown build arch: {}", s))),
        }
    }
}

/// Settings of the machine performing the build (not the one running it)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSettings {
    pub os_build: Os,
    pub arch_build: Arch,
}

impl BuildSettings {
    pub fn new(os_build: Os, arch_build: Arch) -> Self {
        Self { os_build, arch_build }
    }

    /// Settings of the current host
    pub fn detect() -> Self {
        Self::new(Os::current(), Arch::current())
    }

    pub fn is_windows(&self) -> bool {
        self.os_build == Os::Windows
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self::detect()
    }
}

/// Platform-specific behavior queried by every cook step
pub trait HostPlatform: fmt::Debug + Send + Sync {
    /// Whether the build host is Windows
    fn is_windows(&self) -> bool;

    /// Suffix appended to installed executables (`""` or `".exe"`)
    fn exe_suffix(&self) -> &'static str;

    /// Translate a native path into the form expected by the toolchain runner
    fn toolchain_path(&self, path: &Path) -> String;

    /// Path of an executable named `name` inside `dir`
    fn executable(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}{}", name, self.exe_suffix()))
    }
}

/// Unix-like build hosts: paths are used as-is and tools have no suffix
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePlatform;

impl HostPlatform for NativePlatform {
    fn is_windows(&self) -> bool {
        false
    }

    fn exe_suffix(&self) -> &'static str {
        ""
    }

    fn toolchain_path(&self, path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }
}

/// Windows build hosts driving autotools through a POSIX subsystem
#[derive(Debug, Clone, Copy)]
pub struct WindowsPlatform {
    subsystem: PosixSubsystem,
}

impl WindowsPlatform {
    pub fn new(subsystem: PosixSubsystem) -> Self {
        Self { subsystem }
    }

    pub fn subsystem(&self) -> PosixSubsystem {
        self.subsystem
    }
}

impl Default for WindowsPlatform {
    fn default() -> Self {
        Self::new(PosixSubsystem::Msys2)
    }
}

impl HostPlatform for WindowsPlatform {
    fn is_windows(&self) -> bool {
        true
    }

    fn exe_suffix(&self) -> &'static str {
        ".exe"
    }

    fn toolchain_path(&self, path: &Path) -> String {
        unix_path(&path.to_string_lossy(), self.subsystem)
    }
}

/// Pick the platform adapter for the given build settings
///
/// Windows hosts without a detected subsystem fall back to MSYS2, which is
/// what the kitchen installs as a build requirement in that case.
pub fn host_platform(
    settings: &BuildSettings,
    subsystem: Option<PosixSubsystem>,
) -> Arc<dyn HostPlatform> {
    if settings.is_windows() {
        Arc::new(WindowsPlatform::new(
            subsystem.unwrap_or(PosixSubsystem::Msys2),
        ))
    } else {
        Arc::new(NativePlatform)
    }
}
