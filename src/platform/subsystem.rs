// src/platform/subsystem.rs

//! POSIX subsystems available on Windows build hosts

use crate::error::{Error, Result};
use std::fmt;
use std::process::Command;
use std::str::FromStr;
use tracing::debug;

/// A POSIX environment layered on Windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosixSubsystem {
    Msys,
    Msys2,
    Cygwin,
    Wsl,
}

impl PosixSubsystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Msys => "msys",
            Self::Msys2 => "msys2",
            Self::Cygwin => "cygwin",
            Self::Wsl => "wsl",
        }
    }

    /// Classify the output of `uname -a`
    pub fn from_uname(output: &str) -> Option<Self> {
        let output = output.trim();
        if output.starts_with("MINGW32_NT")
            || output.starts_with("MINGW64_NT")
            || output.starts_with("MSYS_NT")
        {
            Some(Self::Msys2)
        } else if output.starts_with("CYGWIN_NT") {
            Some(Self::Cygwin)
        } else if output.contains("MSYS") {
            Some(Self::Msys)
        } else if output.contains("Microsoft") || output.contains("WSL") {
            Some(Self::Wsl)
        } else {
            None
        }
    }

    /// Detect the subsystem providing `uname` on this host
    ///
    /// Always `None` outside Windows.
    pub fn detect() -> Option<Self> {
        if !cfg!(windows) {
            return None;
        }

        let uname = which::which("uname").ok()?;
        let output = Command::new(uname).arg("-a").output().ok()?;
        if !output.status.success() {
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let detected = Self::from_uname(&stdout);
        debug!("Detected Windows subsystem: {:?}", detected);
        detected
    }
}

impl fmt::Display for PosixSubsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PosixSubsystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "msys" => Ok(Self::Msys),
            "msys2" => Ok(Self::Msys2),
            "cygwin" => Ok(Self::Cygwin),
            "wsl" => Ok(Self::Wsl),
            other => Err(Error::ParseError(format!("Unknown subsystem: {}", other))),
        }
    }
}

/// Convert a native Windows path to the subsystem's path convention
///
/// `C:\Users\me` becomes `/c/users/me` (MSYS/MSYS2), `/cygdrive/c/users/me`
/// (Cygwin) or `/mnt/c/Users/me` (WSL). Only MSYS and Cygwin fold case.
pub fn unix_path(path: &str, subsystem: PosixSubsystem) -> String {
    let bytes = path.as_bytes();
    let has_drive = bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/');

    let converted = if has_drive {
        format!("/{}/{}", &path[..1], &path[3..]).replace('\\', "/")
    } else {
        path.replace('\\', "/")
    };

    match subsystem {
        PosixSubsystem::Msys | PosixSubsystem::Msys2 => converted.to_lowercase(),
        PosixSubsystem::Cygwin if has_drive => format!("/cygdrive{}", converted.to_lowercase()),
        PosixSubsystem::Cygwin => converted.to_lowercase(),
        PosixSubsystem::Wsl if has_drive => {
            format!("/mnt{}{}", converted[..2].to_lowercase(), &converted[2..])
        }
        PosixSubsystem::Wsl => converted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subsystem() {
        assert_eq!("MSYS2".parse::<PosixSubsystem>().unwrap(), PosixSubsystem::Msys2);
        assert_eq!("wsl".parse::<PosixSubsystem>().unwrap(), PosixSubsystem::Wsl);
        assert!("mingw".parse::<PosixSubsystem>().is_err());
    }

    #[test]
    fn test_unix_path_msys2() {
        assert_eq!(
            unix_path(r"C:\Users\Build\automake\bin", PosixSubsystem::Msys2),
            "/c/users/build/automake/bin"
        );
        assert_eq!(
            unix_path("C:/Users/Build", PosixSubsystem::Msys2),
            "/c/users/build"
        );
    }

    #[test]
    fn test_unix_path_cygwin() {
        assert_eq!(
            unix_path(r"D:\Pkg\Share", PosixSubsystem::Cygwin),
            "/cygdrive/d/pkg/share"
        );
    }

    #[test]
    fn test_unix_path_wsl_keeps_case() {
        assert_eq!(
            unix_path(r"C:\Users\Build", PosixSubsystem::Wsl),
            "/mnt/c/Users/Build"
        );
    }

    #[test]
    fn test_unix_path_without_drive() {
        assert_eq!(unix_path(r"rel\Dir", PosixSubsystem::Wsl), "rel/Dir");
        assert_eq!(unix_path("/tmp/Pkg", PosixSubsystem::Msys2), "/tmp/pkg");
    }

    #[test]
    fn test_from_uname() {
        assert_eq!(
            PosixSubsystem::from_uname("MINGW64_NT-10.0-19045 host 3.4.6 x86_64 Msys"),
            Some(PosixSubsystem::Msys2)
        );
        assert_eq!(
            PosixSubsystem::from_uname("MSYS_NT-10.0 host 3.1.7 x86_64 Msys"),
            Some(PosixSubsystem::Msys2)
        );
        assert_eq!(
            PosixSubsystem::from_uname("CYGWIN_NT-10.0 host 3.3.4 x86_64 Cygwin"),
            Some(PosixSubsystem::Cygwin)
        );
        assert_eq!(
            PosixSubsystem::from_uname("Linux host 4.4.0-19041-Microsoft #1 SMP x86_64 GNU/Linux"),
            Some(PosixSubsystem::Wsl)
        );
        assert_eq!(
            PosixSubsystem::from_uname("Linux host 6.1.0 #1 SMP x86_64 GNU/Linux"),
            None
        );
    }
}
