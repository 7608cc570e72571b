// src/version/mod.rs

//! Recipe version handling
//!
//! Versions come straight from the source table (`"1.16.1"`). Only the
//! leading `<major>.<minor>` pair carries meaning for the kitchen: Automake
//! installs its Perl modules under `share/automake-<major>.<minor>`.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// The `<major>.<minor>` prefix of a dotted version string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MajorMinor {
    pub major: u64,
    pub minor: u64,
}

impl MajorMinor {
    /// Parse the first two dot-separated components of a version
    ///
    /// Examples:
    /// - "1.16.1" → 1.16
    /// - "1.16" → 1.16
    /// - "1" → error
    pub fn parse(version: &str) -> Result<Self> {
        let mut parts = version.splitn(3, '.');
        let major = parts.next().and_then(parse_component);
        let minor = parts.next().and_then(parse_component);

        match (major, minor) {
            (Some(major), Some(minor)) => Ok(Self { major, minor }),
            _ => Err(Error::InvalidVersion(version.to_string())),
        }
    }
}

fn parse_component(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for MajorMinor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for MajorMinor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Return the first two dot-separated components of `version` unchanged
///
/// The components are validated as numeric but returned as written, so
/// `"1.016.1"` yields `"1.016"`.
pub fn version_major_minor(version: &str) -> Result<String> {
    MajorMinor::parse(version)?;
    let mut parts = version.splitn(3, '.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) => Ok(format!("{}.{}", major, minor)),
        _ => Err(Error::InvalidVersion(version.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_minor_three_components() {
        assert_eq!(version_major_minor("1.16.1").unwrap(), "1.16");
        assert_eq!(version_major_minor("1.15.1").unwrap(), "1.15");
    }

    #[test]
    fn test_major_minor_two_components() {
        assert_eq!(version_major_minor("1.16").unwrap(), "1.16");
    }

    #[test]
    fn test_major_minor_keeps_trailing_parts_out() {
        assert_eq!(version_major_minor("1.16.1.2").unwrap(), "1.16");
    }

    #[test]
    fn test_major_minor_rejects_single_component() {
        assert!(matches!(
            version_major_minor("1"),
            Err(Error::InvalidVersion(_))
        ));
        assert!(version_major_minor("").is_err());
    }

    #[test]
    fn test_major_minor_rejects_non_numeric() {
        assert!(version_major_minor("1.x.3").is_err());
        assert!(version_major_minor("v1.16").is_err());
        assert!(version_major_minor("1..2").is_err());
    }

    #[test]
    fn test_parse_struct() {
        let mm: MajorMinor = "1.16.5".parse().unwrap();
        assert_eq!(mm, MajorMinor { major: 1, minor: 16 });
        assert_eq!(mm.to_string(), "1.16");
    }
}
