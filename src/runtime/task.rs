use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, trace};

/// A repeating job with an explicit period and cancel handle.
///
/// The first run happens one period after spawning. Late ticks fire late
/// and are never batched. Each run holds the task's gate lock, so once
/// [`cancel`](Self::cancel) returns no run is in flight and none follows.
/// Dropping the task cancels it.
#[derive(Debug)]
pub struct PeriodicTask {
    name: &'static str,
    period: Duration,
    cancelled: Arc<Mutex<bool>>,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawns `body` on the current Tokio runtime, calling it every `period`
    /// with a zero-based run index.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime or if `period` is zero.
    pub fn spawn<F>(name: &'static str, period: Duration, mut body: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        assert!(!period.is_zero(), "periodic task `{name}` needs a non-zero period");
        let cancelled = Arc::new(Mutex::new(false));
        let gate = Arc::clone(&cancelled);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut run = 0_u64;
            loop {
                interval.tick().await;
                {
                    let cancelled = gate.lock();
                    if *cancelled {
                        break;
                    }
                    trace!(task = name, run, "periodic run");
                    body(run);
                }
                run += 1;
            }
        });
        debug!(task = name, period_ms = period.as_millis() as u64, "periodic task spawned");
        Self {
            name,
            period,
            cancelled,
            handle,
        }
    }

    /// Stops the task. Blocks until an in-flight run has finished.
    pub fn cancel(&self) {
        let mut cancelled = self.cancelled.lock();
        if !*cancelled {
            *cancelled = true;
            self.handle.abort();
            debug!(task = self.name, "periodic task cancelled");
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.lock()
    }

    /// Interval between runs.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Label used in log events.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
