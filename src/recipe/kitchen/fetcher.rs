// src/recipe/kitchen/fetcher.rs

//! Source acquisition: download, verify, unpack and patch

use crate::error::{Error, Result};
use crate::hash::verify_file;
use crate::recipe::data::SourceEntry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::archive::{apply_patch, download_file, extract_archive};

/// Fetches source archives and applies patches
///
/// Every operation is atomic from the cook's point of view: it either
/// completes or returns the failure unchanged.
pub trait SourceFetcher: Send + Sync {
    /// Obtain a verified local copy of the archive
    fn fetch(&self, entry: &SourceEntry) -> Result<PathBuf>;

    /// Unpack an archive into `dest`
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<()>;

    /// Apply one patch file inside `base_dir`
    fn apply_patch(&self, base_dir: &Path, patch_file: &Path, strip: u32) -> Result<()>;

    /// Whether `entry` can be provided without network access
    fn is_cached(&self, _entry: &SourceEntry) -> bool {
        false
    }
}

/// Default fetcher backed by a checksum-keyed source cache
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    source_cache: PathBuf,
}

impl ArchiveFetcher {
    pub fn new(source_cache: impl Into<PathBuf>) -> Self {
        Self {
            source_cache: source_cache.into(),
        }
    }

    /// Location of `entry` inside the cache
    pub fn cached_path(&self, entry: &SourceEntry) -> PathBuf {
        let key = format!("{}-{}", entry.sha256.to_lowercase(), entry.filename());
        self.source_cache.join(key)
    }
}

impl SourceFetcher for ArchiveFetcher {
    fn fetch(&self, entry: &SourceEntry) -> Result<PathBuf> {
        let urls = entry.urls();
        if urls.is_empty() {
            return Err(Error::DownloadError(format!(
                "No source URL for {}",
                entry.filename()
            )));
        }

        fs::create_dir_all(&self.source_cache)?;

        let cached_path = self.cached_path(entry);

        if cached_path.exists() {
            debug!("Using cached source: {}", cached_path.display());
            if verify_file(&cached_path, &entry.sha256)? {
                return Ok(cached_path);
            }
            warn!("Cached file checksum mismatch, re-downloading");
            fs::remove_file(&cached_path)?;
        }

        let temp_path = cached_path.with_extension("tmp");
        let mut last_error = None;

        for url in urls {
            info!("Downloading: {}", url);
            match download_file(url, &temp_path) {
                Ok(()) => {
                    last_error = None;
                    break;
                }
                Err(e) => {
                    warn!("Download from {} failed: {}", url, e);
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        if !verify_file(&temp_path, &entry.sha256)? {
            let actual = crate::hash::sha256_file(&temp_path)?;
            fs::remove_file(&temp_path)?;
            return Err(Error::ChecksumMismatch {
                expected: entry.sha256.clone(),
                actual,
            });
        }

        fs::rename(&temp_path, &cached_path)?;
        Ok(cached_path)
    }

    fn unpack(&self, archive: &Path, dest: &Path) -> Result<()> {
        extract_archive(archive, dest)
    }

    fn apply_patch(&self, base_dir: &Path, patch_file: &Path, strip: u32) -> Result<()> {
        apply_patch(base_dir, patch_file, strip)
    }

    fn is_cached(&self, entry: &SourceEntry) -> bool {
        let cached_path = self.cached_path(entry);
        cached_path.exists() && verify_file(&cached_path, &entry.sha256).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;
    use crate::recipe::data::SourceUrl;

    fn entry_for(path: &Path, data: &[u8]) -> SourceEntry {
        fs::write(path, data).unwrap();
        SourceEntry {
            url: SourceUrl::Single(format!("file://{}", path.display())),
            sha256: sha256(data),
        }
    }

    #[test]
    fn test_fetch_populates_cache() {
        let dir = tempfile::tempdir().unwrap();
        let entry = entry_for(&dir.path().join("automake-1.16.1.tar.gz"), b"archive");
        let fetcher = ArchiveFetcher::new(dir.path().join("cache"));

        assert!(!fetcher.is_cached(&entry));
        let path = fetcher.fetch(&entry).unwrap();
        assert_eq!(path, fetcher.cached_path(&entry));
        assert!(path.to_string_lossy().ends_with("automake-1.16.1.tar.gz"));
        assert!(fetcher.is_cached(&entry));
    }

    #[test]
    fn test_fetch_rejects_checksum_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut entry = entry_for(&dir.path().join("a.tar.gz"), b"archive");
        entry.sha256 = "0".repeat(64);
        let fetcher = ArchiveFetcher::new(dir.path().join("cache"));

        assert!(matches!(
            fetcher.fetch(&entry),
            Err(Error::ChecksumMismatch { .. })
        ));
        assert!(!fetcher.cached_path(&entry).exists());
    }

    #[test]
    fn test_fetch_replaces_corrupt_cache_entry() {
        let dir = tempfile::tempdir().unwrap();
        let entry = entry_for(&dir.path().join("a.tar.gz"), b"archive");
        let fetcher = ArchiveFetcher::new(dir.path().join("cache"));

        fs::create_dir_all(dir.path().join("cache")).unwrap();
        fs::write(fetcher.cached_path(&entry), b"corrupt").unwrap();
        assert!(!fetcher.is_cached(&entry));

        let path = fetcher.fetch(&entry).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"archive");
    }

    #[test]
    fn test_fetch_without_urls_is_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let entry = SourceEntry {
            url: SourceUrl::Mirrors(Vec::new()),
            sha256: sha256(b"archive"),
        };
        let fetcher = ArchiveFetcher::new(dir.path().join("cache"));

        assert!(matches!(fetcher.fetch(&entry), Err(Error::DownloadError(_))));
        assert!(!dir.path().join("cache").exists());
    }

    #[test]
    fn test_fetch_tries_mirrors_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.tar.gz");
        fs::write(&good, b"archive").unwrap();
        let entry = SourceEntry {
            url: SourceUrl::Mirrors(vec![
                "file:///nonexistent/a.tar.gz".to_string(),
                format!("file://{}", good.display()),
            ]),
            sha256: sha256(b"archive"),
        };
        let fetcher = ArchiveFetcher::new(dir.path().join("cache"));
        assert!(fetcher.fetch(&entry).is_ok());
    }
}
