//! Lazy directory tree walker
//!
//! Streams every non-directory entry under a root, depth-first, so that
//! hashing can start before traversal finishes. Per-entry failures are
//! logged and skipped; only a failure to open the root ends the walk
//! with an error.

use crate::error::Result;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Counters collected while walking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Non-directory entries yielded
    pub files: u64,
    /// Entries skipped because of traversal errors
    pub skipped: u64,
}

/// Directory tree walker
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
}

impl TreeWalker {
    /// Create a walker rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Start walking
    pub fn walk(&self) -> Walk {
        let inner = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Walk {
            inner,
            stats: WalkStats::default(),
            finished: false,
        }
    }
}

impl IntoIterator for TreeWalker {
    type Item = Result<PathBuf>;
    type IntoIter = Walk;

    fn into_iter(self) -> Walk {
        self.walk()
    }
}

/// Iterator over the file paths of a tree
pub struct Walk {
    inner: walkdir::IntoIter,
    stats: WalkStats,
    finished: bool,
}

impl Walk {
    /// Counters so far
    pub fn stats(&self) -> WalkStats {
        self.stats
    }
}

impl Iterator for Walk {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if entry.file_type().is_dir() {
                        continue;
                    }
                    self.stats.files += 1;
                    return Some(Ok(entry.into_path()));
                }
                Err(err) if err.depth() == 0 => {
                    self.finished = true;
                    return Some(Err(err.into()));
                }
                Err(err) => {
                    self.stats.skipped += 1;
                    tracing::warn!("{}", err);
                }
            }
        }
    }
}
