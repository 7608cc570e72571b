// src/hash.rs

//! SHA-256 checksums for source archives
//!
//! Source tables pin every archive by its SHA-256 digest, written as a
//! lowercase (or uppercase) 64-character hex string without prefix.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Length of a hex-encoded SHA-256 digest
pub const SHA256_HEX_LEN: usize = 64;

/// Check that `s` looks like a hex SHA-256 digest
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == SHA256_HEX_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Compute the SHA-256 of a byte slice as lowercase hex
pub fn sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Compute the SHA-256 of everything readable from `reader`
pub fn sha256_reader<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compute the SHA-256 of a file, streaming its content
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .map_err(|e| Error::IoError(format!("Failed to open {}: {}", path.display(), e)))?;
    Ok(sha256_reader(&mut file)?)
}

/// Verify a file against an expected SHA-256 digest
///
/// Returns `Ok(false)` on mismatch; only I/O problems and malformed
/// expectations are errors.
pub fn verify_file(path: &Path, expected: &str) -> Result<bool> {
    if !is_sha256_hex(expected) {
        return Err(Error::ParseError(format!(
            "Invalid sha256 checksum: {}",
            expected
        )));
    }

    let actual = sha256_file(path)?;
    Ok(actual.eq_ignore_ascii_case(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HELLO_WORLD: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_sha256_bytes() {
        assert_eq!(sha256(b"hello world"), HELLO_WORLD);
    }

    #[test]
    fn test_sha256_reader_matches_bytes() {
        let data = vec![7u8; 20_000];
        let mut cursor = std::io::Cursor::new(&data);
        assert_eq!(sha256_reader(&mut cursor).unwrap(), sha256(&data));
    }

    #[test]
    fn test_is_sha256_hex() {
        assert!(is_sha256_hex(HELLO_WORLD));
        assert!(is_sha256_hex(&HELLO_WORLD.to_uppercase()));
        assert!(!is_sha256_hex("abc"));
        assert!(!is_sha256_hex(&"g".repeat(64)));
    }

    #[test]
    fn test_verify_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();

        assert!(verify_file(file.path(), HELLO_WORLD).unwrap());
        assert!(verify_file(file.path(), &HELLO_WORLD.to_uppercase()).unwrap());
        assert!(!verify_file(file.path(), &"0".repeat(64)).unwrap());
    }

    #[test]
    fn test_verify_file_rejects_bad_checksum_format() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(verify_file(file.path(), "sha256:abc").is_err());
    }

    #[test]
    fn test_verify_missing_file() {
        assert!(verify_file(Path::new("/nonexistent/archive.tar.gz"), HELLO_WORLD).is_err());
    }
}
