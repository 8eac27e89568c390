//! Bounded hash worker pool
//!
//! N workers share one path queue and one result queue. Shutdown runs in
//! one direction only:
//!
//! 1. the producer drops its path `Sender`, closing the path queue
//! 2. each worker drains what is left and exits
//! 3. the coordinator joins every worker
//! 4. the coordinator drops the result `Sender`, closing the result queue
//! 5. the collector drains the remaining results and returns
//!
//! The coordinator owns the only result `Sender`; workers borrow it inside
//! a thread scope. The result queue therefore cannot close while any
//! worker is still running.

use crate::config::HashConfig;
use crate::error::{Result, Sha3SumError};
use crate::hash::hash_file;
use crate::manifest::ResultLine;
use crossbeam::channel::{Receiver, Sender};
use std::path::PathBuf;
use std::thread;

/// Counters aggregated over all workers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of workers that ran
    pub workers: usize,
    /// Files hashed and forwarded to the result queue
    pub hashed: u64,
    /// Files that could not be hashed
    pub failed: u64,
}

#[derive(Debug, Default)]
struct WorkerStats {
    hashed: u64,
    failed: u64,
}

/// Pool of hash workers
#[derive(Debug, Clone)]
pub struct HashPool {
    config: HashConfig,
    workers: usize,
}

impl HashPool {
    /// Create a pool sized from `config.workers` (0 = one per CPU)
    pub fn new(config: HashConfig) -> Self {
        let workers = config.effective_workers();
        Self { config, workers }
    }

    /// Number of workers this pool will spawn
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run the pool on a dedicated coordinator thread
    pub fn spawn(self, paths: Receiver<PathBuf>, results: Sender<ResultLine>) -> Result<PoolHandle> {
        let coordinator = thread::Builder::new()
            .name("hash-pool".to_string())
            .spawn(move || self.run(paths, results))
            .map_err(|e| Sha3SumError::ThreadPoolError(format!("failed to spawn coordinator: {}", e)))?;

        Ok(PoolHandle { coordinator })
    }

    /// Run all workers to completion on the calling thread.
    ///
    /// Returns once `paths` is closed and drained and every worker has
    /// exited. `results` is dropped only after that point.
    pub fn run(&self, paths: Receiver<PathBuf>, results: Sender<ResultLine>) -> Result<PoolStats> {
        let outcome = thread::scope(|scope| {
            let (paths, results, config) = (&paths, &results, &self.config);

            let mut handles = Vec::with_capacity(self.workers);
            for id in 0..self.workers {
                let handle = thread::Builder::new()
                    .name(format!("hash-worker-{}", id))
                    .spawn_scoped(scope, move || hash_worker(id, paths, results, config))
                    .map_err(|e| {
                        Sha3SumError::ThreadPoolError(format!("failed to spawn worker {}: {}", id, e))
                    })?;
                handles.push(handle);
            }

            let mut stats = PoolStats {
                workers: handles.len(),
                ..Default::default()
            };
            let mut panicked = 0usize;

            for handle in handles {
                match handle.join() {
                    Ok(worker) => {
                        stats.hashed += worker.hashed;
                        stats.failed += worker.failed;
                    }
                    Err(_) => panicked += 1,
                }
            }

            if panicked > 0 {
                return Err(Sha3SumError::ThreadPoolError(format!(
                    "{} hash worker(s) panicked",
                    panicked
                )));
            }
            Ok(stats)
        });

        drop(results);
        tracing::debug!("all hash workers joined, result queue closed");
        outcome
    }
}

/// Handle to a running pool
pub struct PoolHandle {
    coordinator: thread::JoinHandle<Result<PoolStats>>,
}

impl PoolHandle {
    /// Wait for the coordinator and every worker to finish
    pub fn join(self) -> Result<PoolStats> {
        self.coordinator
            .join()
            .map_err(|_| Sha3SumError::ThreadPoolError("pool coordinator panicked".to_string()))?
    }
}

fn hash_worker(
    id: usize,
    paths: &Receiver<PathBuf>,
    results: &Sender<ResultLine>,
    config: &HashConfig,
) -> WorkerStats {
    tracing::debug!(worker = id, "hash worker started");
    let mut stats = WorkerStats::default();

    for path in paths.iter() {
        match hash_file(&path, config) {
            Ok(digest) => {
                if results.send(ResultLine::new(digest, path)).is_err() {
                    tracing::debug!(worker = id, "result queue closed, stopping");
                    break;
                }
                stats.hashed += 1;
            }
            Err(e) => {
                tracing::warn!("{}", e);
                stats.failed += 1;
            }
        }
    }

    tracing::debug!(worker = id, hashed = stats.hashed, failed = stats.failed, "hash worker finished");
    stats
}
