// src/recipe/kitchen/archive.rs

//! Archive and source file utilities for the Kitchen

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::process::Command;
use tracing::debug;
use xz2::read::XzDecoder;

/// Download a file from a URL
///
/// `file://` URLs and plain paths are copied, which keeps local mirrors
/// and offline source tables working.
pub fn download_file(url: &str, dest: &Path) -> Result<()> {
    if let Some(local) = local_source(url) {
        debug!("Copying local source {}", local.display());
        fs::copy(local, dest).map_err(|e| {
            Error::DownloadError(format!("Failed to copy {}: {}", local.display(), e))
        })?;
        return Ok(());
    }

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("automake-kitchen/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::DownloadError(format!("HTTP client setup failed: {}", e)))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| Error::DownloadError(format!("Failed to download {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(Error::DownloadError(format!(
            "Failed to download {}: HTTP {}",
            url,
            response.status()
        )));
    }

    let mut file = File::create(dest)?;
    response
        .copy_to(&mut file)
        .map_err(|e| Error::DownloadError(format!("Failed to write {}: {}", dest.display(), e)))?;

    Ok(())
}

fn local_source(url: &str) -> Option<&Path> {
    if let Some(path) = url.strip_prefix("file://") {
        return Some(Path::new(path));
    }
    if url.contains("://") {
        return None;
    }
    Some(Path::new(url))
}

/// Extract an archive to a destination directory
///
/// Supports: .tar.gz, .tgz, .tar.xz, .txz, .tar
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let filename = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let open = || {
        File::open(archive)
            .map_err(|e| Error::IoError(format!("Failed to open {}: {}", archive.display(), e)))
    };

    let reader: Box<dyn Read> = if filename.ends_with(".tar.gz") || filename.ends_with(".tgz") {
        Box::new(GzDecoder::new(open()?))
    } else if filename.ends_with(".tar.xz") || filename.ends_with(".txz") {
        Box::new(XzDecoder::new(open()?))
    } else if filename.ends_with(".tar") {
        Box::new(open()?)
    } else {
        return Err(Error::ParseError(format!(
            "Unknown archive format: {}",
            filename
        )));
    };

    fs::create_dir_all(dest)?;
    let mut tarball = tar::Archive::new(reader);
    tarball.set_preserve_permissions(true);
    tarball
        .unpack(dest)
        .map_err(|e| Error::IoError(format!("Failed to extract archive: {}", e)))?;

    Ok(())
}

/// Apply a patch inside `base_dir`
pub fn apply_patch(base_dir: &Path, patch_path: &Path, strip: u32) -> Result<()> {
    let output = Command::new("patch")
        .arg(format!("-p{}", strip))
        .arg("-i")
        .arg(patch_path)
        .current_dir(base_dir)
        .output()
        .map_err(|e| Error::IoError(format!("patch failed: {}", e)))?;

    if !output.status.success() {
        return Err(Error::CommandFailed {
            phase: format!("patch {}", patch_path.display()),
            code: output.status.code(),
            stderr: format!(
                "{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_archive_unknown_format() {
        let result = extract_archive(Path::new("file.unknown"), Path::new("/tmp"));
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_tar_gz() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("pkg-1.0.tar.gz");
        write_tar_gz(
            &archive,
            &[
                ("pkg-1.0/COPYING", &b"license"[..]),
                ("pkg-1.0/configure", &b"#!/bin/sh\n"[..]),
            ],
        );

        let dest = dir.path().join("out");
        extract_archive(&archive, &dest).unwrap();
        assert_eq!(fs::read(dest.join("pkg-1.0/COPYING")).unwrap(), b"license");
        assert!(dest.join("pkg-1.0/configure").is_file());
    }

    #[test]
    fn test_download_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.tar.gz");
        fs::write(&src, b"data").unwrap();

        let dest = dir.path().join("copy");
        download_file(&format!("file://{}", src.display()), &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"data");

        let dest2 = dir.path().join("copy2");
        download_file(src.to_str().unwrap(), &dest2).unwrap();
        assert_eq!(fs::read(&dest2).unwrap(), b"data");
    }

    #[test]
    fn test_download_missing_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = download_file("file:///nonexistent/src.tar.gz", &dir.path().join("x"));
        assert!(matches!(result, Err(Error::DownloadError(_))));
    }
}
