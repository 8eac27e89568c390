//! # sha3sum - SHA-3 and SHAKE checksums for files and directory trees
//!
//! Computes fixed-output (SHA3-224/256/384/512) and extendable-output
//! (SHAKE128/256) digests and checks `sum`-style manifests.
//!
//! ## Features
//!
//! - **Parallel directory hashing**: a walker, a bounded pool of hash
//!   workers and a single collector connected by bounded queues
//! - **Extendable output**: SHAKE digests of any requested length
//! - **Manifest checking**: `<hex>  <path>` files, fail-fast verification
//!
//! ## Quick Start
//!
//! ```no_run
//! use sha3sum::config::{HashAlgorithm, HashConfig};
//! use sha3sum::core::hash_directory;
//! use std::path::Path;
//!
//! let config = HashConfig::new(HashAlgorithm::Shake256, 32)?.with_workers(8);
//! let summary = hash_directory(Path::new("/data"), &config, std::io::stdout().lock())?;
//! eprintln!("{}", summary);
//! # Ok::<(), sha3sum::Sha3SumError>(())
//! ```
//!
//! ## Verification
//!
//! ```no_run
//! use sha3sum::config::HashConfig;
//! use sha3sum::verify::verify_manifest;
//! use std::path::Path;
//!
//! let result = verify_manifest(Path::new("SUMS"), &HashConfig::default(), std::io::stdout().lock());
//! if let Err(sha3sum::Sha3SumError::DigestMismatch { path }) = result {
//!     eprintln!("{} changed", path.display());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod hash;
pub mod manifest;
pub mod verify;

// Re-export commonly used types
pub use config::{HashAlgorithm, HashConfig};
pub use error::{Result, Sha3SumError};
pub use hash::Digest;
pub use manifest::{ManifestEntry, ResultLine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use sha3sum::prelude::*;
    //! ```

    pub use crate::config::{HashAlgorithm, HashConfig};
    pub use crate::core::{hash_directory, hash_single, hash_target, DirectorySummary, HashPool};
    pub use crate::error::{Result, Sha3SumError};
    pub use crate::fs::TreeWalker;
    pub use crate::hash::{digest, hash_bytes, hash_file, Digest};
    pub use crate::manifest::{format_line, parse_line, write_line, ManifestEntry, ManifestReader, ResultLine};
    pub use crate::verify::{verify_manifest, VerifySummary};
}
