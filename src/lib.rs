//! Real-time metric simulation engine for a data center operations dashboard.

pub mod config;
/// History export.
pub mod io;
pub mod logging;
/// Tokio-driven periodic tasks around the engine.
pub mod runtime;
/// Simulation engine, scenarios, history, and dashboard feeds.
pub mod sim;
