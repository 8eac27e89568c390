//! Checksum verification module
//!
//! Re-hashes the files listed in a manifest, one at a time.

mod checker;

pub use checker::*;
