//! Directory and single-file hashing
//!
//! Directory mode wires the tree walker, the worker pool and the
//! collector together through two bounded queues:
//!
//! ```text
//! TreeWalker -> [paths; 512] -> HashPool (N) -> [results; 512] -> Collector -> out
//! ```
//!
//! A full queue blocks its producer; that is the only backpressure.

use crate::config::HashConfig;
use crate::core::{Collector, HashPool};
use crate::error::{Result, Sha3SumError};
use crate::fs::{is_stdin, TreeWalker, WalkStats};
use crate::hash::hash_file;
use crate::manifest::{write_line, ResultLine};
use crossbeam::channel::{bounded, Sender};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of hashing one directory tree
#[derive(Debug, Clone, Serialize)]
pub struct DirectorySummary {
    /// Root that was walked
    pub root: PathBuf,
    /// Result lines written
    pub files_hashed: u64,
    /// Files that could not be hashed and were omitted
    pub files_failed: u64,
    /// Entries skipped by the walker
    pub entries_skipped: u64,
    /// Workers used
    pub workers: usize,
    /// Wall-clock time
    pub elapsed: Duration,
}

impl DirectorySummary {
    /// Whether every enumerated file produced a result line
    pub fn is_complete(&self) -> bool {
        self.files_failed == 0 && self.entries_skipped == 0
    }
}

impl std::fmt::Display for DirectorySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} hashed, {} failed, {} skipped with {} workers in {}",
            self.root.display(),
            self.files_hashed,
            self.files_failed,
            self.entries_skipped,
            self.workers,
            humantime::format_duration(Duration::from_millis(self.elapsed.as_millis() as u64)),
        )
    }
}

/// Hash every file under `root` and write one result line per file.
///
/// Files that cannot be read are logged and left out. A root that cannot
/// be opened, a failed write to `out` or a crashed worker is returned as
/// an error once the pipeline has shut down.
pub fn hash_directory<W: Write>(root: &Path, config: &HashConfig, out: W) -> Result<DirectorySummary> {
    config.validate()?;
    let start = Instant::now();

    let (path_tx, path_rx) = bounded::<PathBuf>(config.queue_capacity);
    let (result_tx, result_rx) = bounded::<ResultLine>(config.queue_capacity);

    let walker = TreeWalker::new(root);
    let producer = thread::Builder::new()
        .name("tree-walker".to_string())
        .spawn(move || produce_paths(walker, path_tx))
        .map_err(|e| Sha3SumError::ThreadPoolError(format!("failed to spawn walker: {}", e)))?;

    let pool = HashPool::new(config.clone());
    let workers = pool.workers();
    let pool = pool.spawn(path_rx, result_tx)?;

    let collected = Collector::new(out).drain(&result_rx);
    // unblocks workers if the collector stopped early
    drop(result_rx);

    let walked = producer
        .join()
        .map_err(|_| Sha3SumError::ThreadPoolError("tree walker panicked".to_string()))?;
    let pooled = pool.join();

    let files_hashed = collected?;
    let walk_stats = walked?;
    let pool_stats = pooled?;

    let summary = DirectorySummary {
        root: root.to_path_buf(),
        files_hashed,
        files_failed: pool_stats.failed,
        entries_skipped: walk_stats.skipped,
        workers,
        elapsed: start.elapsed(),
    };
    tracing::info!("{}", summary);

    Ok(summary)
}

fn produce_paths(walker: TreeWalker, paths: Sender<PathBuf>) -> Result<WalkStats> {
    let mut walk = walker.walk();

    while let Some(entry) = walk.next() {
        let path = entry?;
        if paths.send(path).is_err() {
            tracing::debug!("path queue closed, walker stopping");
            break;
        }
    }

    Ok(walk.stats())
}

/// Hash one file (or standard input) and write its result line
pub fn hash_single<W: Write>(path: &Path, config: &HashConfig, mut out: W) -> Result<ResultLine> {
    let digest = hash_file(path, config)?;
    let line = ResultLine::new(digest, path);

    write_line(&mut out, &line).map_err(Sha3SumError::Output)?;
    Ok(line)
}

/// What a hashing target turned out to be
#[derive(Debug, Clone)]
pub enum HashOutcome {
    /// A single file or standard input
    File(ResultLine),
    /// A directory tree
    Directory(DirectorySummary),
}

/// Hash a target: directories recursively, anything else as one file
pub fn hash_target<W: Write>(path: &Path, config: &HashConfig, out: W) -> Result<HashOutcome> {
    if !is_stdin(path) && path.is_dir() {
        hash_directory(path, config, out).map(HashOutcome::Directory)
    } else {
        hash_single(path, config, out).map(HashOutcome::File)
    }
}
