//! File system module
//!
//! Lazy tree walking and input opening for the hashing pipeline.

mod input;
mod walker;

pub use input::*;
pub use walker::*;
