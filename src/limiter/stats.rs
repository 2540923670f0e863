use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use serde::Serialize;
use tracing::info;

/// Counters kept by the admission limiter.
///
/// Everything is a relaxed atomic: values are for observation only and never
/// feed back into admission decisions.
#[derive(Debug, Default)]
pub struct AdmissionStats {
    pub submitted: AtomicU64,
    pub admitted: AtomicU64,
    pub completed: AtomicU64,
    pub failed: AtomicU64,
    pub rejected: AtomicU64,

    pub in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub waiting: AtomicUsize,

    // Gauge-like: last observed value only
    pub last_wait_ms: AtomicU64,
    pub last_run_ms: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub submitted: u64,
    pub admitted: u64,
    pub completed: u64,
    pub failed: u64,
    pub rejected: u64,
    pub in_flight: usize,
    pub peak_in_flight: usize,
    pub waiting: usize,
    pub last_wait_ms: u64,
    pub last_run_ms: u64,
}

impl AdmissionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Marks the caller as queued until the returned guard is dropped.
    /// Dropping covers cancellation as well as admission.
    pub(crate) fn enter_queue(&self) -> QueueGuard<'_> {
        self.waiting.fetch_add(1, Ordering::Relaxed);
        QueueGuard { waiting: &self.waiting }
    }

    pub(crate) fn record_admission(&self, wait_ms: u64) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
        self.last_wait_ms.store(wait_ms, Ordering::Relaxed);
        let running = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::Relaxed);
    }

    pub(crate) fn record_finish(&self, run_ms: u64, succeeded: bool) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
        self.last_run_ms.store(run_ms, Ordering::Relaxed);
        if succeeded {
            self.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            in_flight: self.in_flight(),
            peak_in_flight: self.peak_in_flight(),
            waiting: self.waiting(),
            last_wait_ms: self.last_wait_ms.load(Ordering::Relaxed),
            last_run_ms: self.last_run_ms.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let s = self.snapshot();
        info!(
            "STATS: Submitted: {} | Admitted: {} | Done: {} ok, {} failed, {} rejected | In-flight: {} (peak {}) | Waiting: {} | Latency: wait {}ms, run {}ms",
            s.submitted, s.admitted, s.completed, s.failed, s.rejected,
            s.in_flight, s.peak_in_flight, s.waiting, s.last_wait_ms, s.last_run_ms
        );
    }
}

pub(crate) struct QueueGuard<'a> {
    waiting: &'a AtomicUsize,
}

impl Drop for QueueGuard<'_> {
    fn drop(&mut self) {
        self.waiting.fetch_sub(1, Ordering::Relaxed);
    }
}
