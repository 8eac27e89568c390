//! Error types for sha3sum
//!
//! A single error enum covers digest computation, manifest parsing,
//! directory walking and the worker pool. Whether an error ends the
//! invocation is decided by the caller, never by the library.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for sha3sum operations
#[derive(Error, Debug)]
pub enum Sha3SumError {
    /// I/O error while opening or reading a file
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Algorithm selector matched none of the supported algorithms
    #[error("Unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Requested output length is not usable for an extendable-output algorithm
    #[error("Invalid output length: {0} (must be at least 1 byte)")]
    InvalidLength(usize),

    /// Manifest line does not have the `<hex>  <path>` shape
    #[error("Malformed manifest at line {line}: {reason}")]
    MalformedManifest { line: usize, reason: String },

    /// Manifest digest column is not valid hex
    #[error("Invalid hex digest at line {line}: {source}")]
    InvalidHexEncoding {
        line: usize,
        #[source]
        source: hex::FromHexError,
    },

    /// Recomputed digest differs from the expected one
    #[error("Digest mismatch for '{path}'")]
    DigestMismatch { path: PathBuf },

    /// Per-entry directory traversal failure
    #[error("Walk error: {0}")]
    WalkEntry(String),

    /// Writing results to the output failed
    #[error("Output error: {0}")]
    Output(#[source] std::io::Error),

    /// Thread pool error
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Sha3SumError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed manifest error
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedManifest {
            line,
            reason: reason.into(),
        }
    }

    /// Create a digest mismatch error
    pub fn mismatch(path: impl Into<PathBuf>) -> Self {
        Self::DigestMismatch { path: path.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::DigestMismatch { path } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for sha3sum operations
pub type Result<T> = std::result::Result<T, Sha3SumError>;

impl From<walkdir::Error> for Sha3SumError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf);
        match (path, err.into_io_error()) {
            (Some(path), Some(source)) => Sha3SumError::Io { path, source },
            (path, _) => Sha3SumError::WalkEntry(format!(
                "filesystem loop or unreadable entry at '{}'",
                path.unwrap_or_default().display()
            )),
        }
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| Sha3SumError::io(path, e))
    }
}
