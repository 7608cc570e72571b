// src/error.rs

//! Error types for the kitchen

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while preparing, cooking or publishing a recipe
#[derive(Debug, Error)]
pub enum Error {
    /// No source or patch metadata exists for the requested version
    #[error("No {kind} entry for version {version}")]
    MissingVersion { kind: &'static str, version: String },

    /// Version string cannot be split into numeric major/minor parts
    #[error("Invalid version '{0}': expected at least <major>.<minor>")]
    InvalidVersion(String),

    /// A cook step was called before its predecessor completed
    #[error("Cannot run {step} step while cook is {actual}")]
    InvalidStage { step: &'static str, actual: String },

    /// An external build process exited unsuccessfully
    #[error("{phase} phase failed with exit code {code:?}\nstderr: {stderr}")]
    CommandFailed {
        phase: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Download failed: {0}")]
    DownloadError(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unresolved requirements: {0}")]
    ResolutionError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ParseError(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ParseError(e.to_string())
    }
}
