//! Wall-clock drivers for the synchronous engine and dashboard feeds.
//!
//! Everything here needs a running Tokio runtime.

pub mod feed;
pub mod simulator;
pub mod task;

pub use feed::FeedHandle;
pub use simulator::Simulator;
pub use task::PeriodicTask;
