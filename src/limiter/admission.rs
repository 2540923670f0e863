use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{oneshot, OwnedSemaphorePermit, Semaphore};
use tokio::time::{timeout, Instant};
use tracing::{debug, error, info, warn};

use crate::limiter::stats::AdmissionStats;
use crate::utils::time::{elapsed_ms, now_instant};

/// When a slot goes back to the pool after its work has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefillPolicy {
    /// Slot is returned as soon as the work completes: a pure concurrency cap.
    #[default]
    OnCompletion,
    /// Slot is returned no earlier than `window` after it was handed out, so at
    /// most `request_limit` units of work are admitted in any window.
    Windowed(Duration),
}

#[derive(Debug, Clone)]
pub struct LimiterSettings {
    pub request_limit: usize,
    pub refill: RefillPolicy,
    /// `None` keeps the wait queue unbounded in time.
    pub acquire_timeout: Option<Duration>,
}

impl LimiterSettings {
    pub fn new(request_limit: usize) -> Self {
        Self {
            request_limit,
            refill: RefillPolicy::OnCompletion,
            acquire_timeout: None,
        }
    }

    pub fn with_refill(mut self, refill: RefillPolicy) -> Self {
        self.refill = refill;
        self
    }

    pub fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = Some(acquire_timeout);
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("limiter is closed")]
    Closed,

    #[error("no slot became free within {waited:?}")]
    Timeout { waited: Duration },

    #[error("unit of work panicked")]
    WorkerPanicked,

    #[error("request limit must be at least 1")]
    InvalidCapacity,
}

/// Bounds how many units of work execute at once.
///
/// Callers queue on a fair semaphore, so admission follows submission order.
/// Once admitted, the slot belongs to the worker task rather than the caller:
/// a caller that goes away mid-flight cannot leak it.
#[derive(Debug, Clone)]
pub struct AdmissionLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    refill: RefillPolicy,
    acquire_timeout: Option<Duration>,
    stats: Arc<AdmissionStats>,
}

impl AdmissionLimiter {
    pub fn new(settings: LimiterSettings) -> Result<Self, AdmissionError> {
        if settings.request_limit == 0 {
            return Err(AdmissionError::InvalidCapacity);
        }

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(settings.request_limit)),
            capacity: settings.request_limit,
            refill: settings.refill,
            acquire_timeout: settings.acquire_timeout,
            stats: Arc::new(AdmissionStats::new()),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    pub fn stats(&self) -> &AdmissionStats {
        &self.stats
    }

    /// Stops admitting work. Queued and later submitters get [`AdmissionError::Closed`];
    /// work that already holds a slot runs to completion.
    pub fn close(&self) {
        if !self.semaphore.is_closed() {
            info!("Admission limiter closing ({} in flight, {} waiting)",
                self.stats.in_flight(), self.stats.waiting());
            self.semaphore.close();
        }
    }

    /// Waits for a slot, runs `work` on the blocking pool and returns its result.
    ///
    /// The work's own failure is handed back untouched; admission failures are
    /// converted into the caller's error type.
    pub async fn submit<F, T, E>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<AdmissionError> + Send + 'static,
    {
        self.stats.inc_submitted();

        let queued_at = now_instant();
        let permit = match self.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                self.stats.inc_rejected();
                warn!("Submission rejected: {}", e);
                return Err(e.into());
            }
        };
        let admitted_at = Instant::now();
        self.stats.record_admission(elapsed_ms(queued_at));
        debug!("Slot acquired ({} left)", self.semaphore.available_permits());

        let (tx, rx) = oneshot::channel();
        let stats = Arc::clone(&self.stats);
        let refill = self.refill;

        tokio::spawn(async move {
            let started = now_instant();
            let outcome = tokio::task::spawn_blocking(work).await;
            let succeeded = matches!(outcome, Ok(Ok(_)));
            stats.record_finish(elapsed_ms(started), succeeded);

            // Caller may have gone away; the slot is released regardless.
            let _ = tx.send(outcome);

            if let RefillPolicy::Windowed(window) = refill {
                tokio::time::sleep_until(admitted_at + window).await;
            }
            release(permit);
        });

        match rx.await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) if join_err.is_panic() => {
                error!("Unit of work panicked: {}", join_err);
                Err(AdmissionError::WorkerPanicked.into())
            }
            // Worker cancelled: the runtime is shutting down.
            Ok(Err(_)) | Err(_) => Err(AdmissionError::Closed.into()),
        }
    }

    async fn acquire(&self) -> Result<OwnedSemaphorePermit, AdmissionError> {
        let _queued = self.stats.enter_queue();
        let acquire = Arc::clone(&self.semaphore).acquire_owned();

        let acquired = match self.acquire_timeout {
            Some(limit) => match timeout(limit, acquire).await {
                Ok(acquired) => acquired,
                Err(_) => return Err(AdmissionError::Timeout { waited: limit }),
            },
            None => acquire.await,
        };

        acquired.map_err(|_| AdmissionError::Closed)
    }
}

fn release(permit: OwnedSemaphorePermit) {
    drop(permit);
    debug!("Slot released");
}
