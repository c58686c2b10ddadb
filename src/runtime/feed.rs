use std::sync::Arc;

use parking_lot::Mutex;

use super::task::PeriodicTask;
use crate::sim::dashboard::{DashboardFeed, RefreshProfile};
use crate::sim::perturbation::Perturbation;
use crate::sim::types::MetricState;

/// A dashboard feed refreshed on its own period.
pub struct FeedHandle<P: Perturbation + Send + 'static> {
    feed: Arc<Mutex<DashboardFeed<P>>>,
    task: PeriodicTask,
}

impl<P: Perturbation + Send + 'static> FeedHandle<P> {
    /// Spawns a task refreshing `feed` every `feed.period()`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(feed: DashboardFeed<P>) -> Self {
        let name = match feed.profile() {
            RefreshProfile::Live => "live-feed",
            RefreshProfile::Legacy => "legacy-feed",
        };
        let period = feed.period();
        let feed = Arc::new(Mutex::new(feed));
        let shared = Arc::clone(&feed);
        let task = PeriodicTask::spawn(name, period, move |_| {
            shared.lock().refresh();
        });
        Self { feed, task }
    }

    /// Copy of the latest readings.
    pub fn latest(&self) -> MetricState {
        self.feed.lock().state().clone()
    }

    /// Refreshes applied so far.
    pub fn refreshes(&self) -> u64 {
        self.feed.lock().refreshes()
    }

    /// Stops refreshing; the last readings stay readable.
    pub fn cancel(&self) {
        self.task.cancel();
    }
}
