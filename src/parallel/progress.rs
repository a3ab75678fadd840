//! Progress reporting and cooperative cancellation shared between the caller and workers.
//!
//! Both types are cheap handles around atomics; clone them freely and poll from any thread.
//! Workers only touch them at checkpoints, so the numbers are advisory.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    completed: AtomicU64,
    total: AtomicU64,
}

/// Polling progress counter: candidates scored so far out of the total.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    counters: Arc<Counters>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self, total: u64) {
        self.counters.completed.store(0, Ordering::Relaxed);
        self.counters.total.store(total, Ordering::Relaxed);
    }

    pub fn advance(&self, scored: u64) {
        self.counters.completed.fetch_add(scored, Ordering::Relaxed);
    }

    pub fn completed(&self) -> u64 {
        self.counters.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.counters.total.load(Ordering::Relaxed)
    }

    /// 0.0..=1.0; 0.0 before a search has started.
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.completed() as f64 / total as f64).min(1.0)
    }
}

/// Cooperative cancellation flag checked by workers between chunks and every few combinations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_shared_between_clones() {
        let progress = Progress::new();
        let worker = progress.clone();
        progress.reset(200);
        worker.advance(50);
        assert_eq!(progress.completed(), 50);
        assert!((progress.fraction() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn fraction_is_zero_before_start() {
        assert_eq!(Progress::new().fraction(), 0.0);
    }

    #[test]
    fn cancel_is_visible_to_clones() {
        let token = CancelToken::new();
        let worker = token.clone();
        assert!(!worker.is_cancelled());
        token.cancel();
        assert!(worker.is_cancelled());
    }
}
