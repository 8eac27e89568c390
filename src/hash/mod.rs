//! Hash computation module
//!
//! Streams files and byte slices through SHA-3 and SHAKE hashers.

mod digest;

pub use digest::*;
