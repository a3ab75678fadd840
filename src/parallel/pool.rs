//! Rayon thread pool configuration for the loadout search.
//!
//! Use [WorkerPool::install] to run the search with a fixed number of threads. The worker
//! count is resolved once, before any work is scheduled.

use std::num::NonZeroUsize;
use std::thread;

use rayon::{ThreadPool, ThreadPoolBuilder};

/// Configures how many worker threads are used for parallel chunk execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of requested worker threads. If 0, use every available core.
    pub workers: usize,
    /// Upper bound applied after resolving `workers`. If 0, no extra ceiling.
    pub max_workers: usize,
}

impl WorkerPool {
    /// Use all available CPU cores.
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Use exactly `n` worker threads (still clamped to the hardware).
    pub fn with_workers(n: usize) -> Self {
        Self {
            workers: n,
            max_workers: 0,
        }
    }

    pub fn with_ceiling(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Worker count actually used: requested (0 = all) clamped to hardware concurrency and the
    /// configured ceiling, never below 1.
    pub fn resolved_workers(&self) -> usize {
        let available = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let requested = if self.workers == 0 {
            available
        } else {
            self.workers.min(available)
        };
        let ceiling = if self.max_workers == 0 {
            requested
        } else {
            self.max_workers
        };
        requested.min(ceiling).max(1)
    }

    pub fn build(&self) -> Result<ThreadPool, rayon::ThreadPoolBuildError> {
        ThreadPoolBuilder::new()
            .num_threads(self.resolved_workers())
            .thread_name(|index| format!("shieldtester-worker-{index}"))
            .build()
    }

    /// Run a closure on a dedicated pool sized by [resolved_workers](WorkerPool::resolved_workers).
    pub fn install<F, R>(&self, f: F) -> Result<R, rayon::ThreadPoolBuildError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        let pool = self.build()?;
        Ok(pool.install(f))
    }
}
