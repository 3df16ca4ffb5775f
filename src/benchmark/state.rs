//! Shared run state: sticky failure flag and cooperative cancellation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// The only mutable state shared between worker threads.
///
/// Both flags are write-once to true. Concurrent marks are idempotent
/// and nothing ever clears them, so each query needs only the current
/// value and no flag transition can be lost.
#[derive(Debug, Default)]
pub struct RunState {
    failed: AtomicBool,
    cancelled: AtomicBool,
    request_errors: AtomicU64,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. Sticky for the rest of the run.
    pub fn mark_failed(&self) {
        self.failed.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    /// Ask every worker to stop at its next loop-iteration check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn record_request_error(&self) {
        self.request_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_errors(&self) -> u64 {
        self.request_errors.load(Ordering::Relaxed)
    }
}
