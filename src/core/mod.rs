//! Core hashing engine module
//!
//! Provides the worker pool, the result collector and the directory
//! pipeline that connects them to the tree walker.

mod collector;
mod pipeline;
mod pool;

pub use collector::*;
pub use pipeline::*;
pub use pool::*;
