//! Input sources: regular files or standard input

use crate::error::{IoResultExt, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Path name that selects standard input
pub const STDIN_PATH: &str = "-";

/// Whether `path` names standard input
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_PATH
}

/// Open a path for reading, mapping `-` to standard input
pub fn open_input(path: &Path) -> Result<Box<dyn Read + Send>> {
    if is_stdin(path) {
        return Ok(Box::new(std::io::stdin()));
    }

    let file = File::open(path).with_path(path)?;
    Ok(Box::new(file))
}
