//! Checksum manifest module
//!
//! Reads and writes the two-column `sum`-style manifest format.

mod codec;

pub use codec::*;
