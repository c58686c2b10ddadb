/// Per-tick state transition.
pub mod advancer;
/// Two-state simulation clock.
pub mod clock;
/// Live and legacy KPI refreshers.
pub mod dashboard;
pub mod engine;
/// Temperature zones and rack layout.
pub mod floor;
pub mod history;
pub mod kpi;
pub mod perturbation;
/// Scenario catalog.
pub mod scenario;
pub mod types;
