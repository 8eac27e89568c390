//! Configuration module for sha3sum
//!
//! Provides CLI arguments, algorithm selection and the immutable
//! runtime configuration.

mod settings;

pub use settings::*;
