//! Simulation engine owning the metric state, history, clock, and active scenario.

use chrono::Local;
use serde::Serialize;
use tracing::{debug, info};

use super::advancer::advance;
use super::clock::{ClockState, SimulationClock};
use super::history::HistoryRing;
use super::perturbation::{Perturbation, SeededPerturbation};
use super::scenario::{Scenario, ScenarioId, UnknownScenarioError};
use super::types::{Baseline, EngineSettings, HistoryEntry, MetricState, format_timestamp};

/// Simulation engine and control surface.
///
/// Generic over `P: Perturbation` for static dispatch, so tests can inject a
/// deterministic noise source. The engine is the only mutator of its state
/// and history; readers get shared references or cloned snapshots.
pub struct Engine<P: Perturbation = SeededPerturbation> {
    baseline: Baseline,
    state: MetricState,
    scenario: ScenarioId,
    clock: SimulationClock,
    history: HistoryRing,
    perturbation: P,
}

/// Read-only copy of everything the display layer needs.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    /// Current readings.
    pub state: MetricState,
    /// Trend entries, oldest first.
    pub history: Vec<HistoryEntry>,
    /// Active scenario id.
    pub scenario: ScenarioId,
    /// Advisory labels of the active scenario.
    pub advisory_alerts: &'static [&'static str],
    /// Idle or running.
    pub clock: ClockState,
    /// Ticks processed since the last reset.
    pub ticks: u64,
}

impl<P: Perturbation> Engine<P> {
    /// Creates an idle engine holding the baseline readings.
    ///
    /// # Arguments
    ///
    /// * `settings` - Baseline, tick period, history capacity, initial scenario
    /// * `perturbation` - Noise source used on every tick
    pub fn new(settings: EngineSettings, perturbation: P) -> Self {
        let EngineSettings {
            baseline,
            tick_period,
            history_capacity,
            initial_scenario,
        } = settings;
        let state = MetricState::from_baseline(&baseline, format_timestamp(&Local::now()));
        Self {
            baseline,
            state,
            scenario: initial_scenario,
            clock: SimulationClock::new(tick_period),
            history: HistoryRing::new(history_capacity),
            perturbation,
        }
    }

    /// Starts delivering ticks. No effect if already running.
    pub fn start(&mut self) {
        if self.clock.start() {
            info!(scenario = %self.scenario, "simulation started");
        }
    }

    /// Stops delivering ticks. No effect if already idle.
    pub fn pause(&mut self) {
        if self.clock.pause() {
            info!(ticks = self.clock.ticks(), "simulation paused");
        }
    }

    /// Flips between running and idle.
    ///
    /// # Returns
    ///
    /// `true` if the engine is running afterwards.
    pub fn toggle_running(&mut self) -> bool {
        if self.clock.is_running() {
            self.pause();
        } else {
            self.start();
        }
        self.clock.is_running()
    }

    /// Sets the scenario used from the next tick on.
    ///
    /// Does not advance state or clear history.
    pub fn select_scenario(&mut self, id: ScenarioId) {
        if self.scenario != id {
            info!(from = %self.scenario, to = %id, "scenario selected");
        }
        self.scenario = id;
    }

    /// Resolves `id` through the registry and selects it.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownScenarioError`] and leaves the active scenario
    /// untouched if `id` is not a catalog key.
    pub fn select_scenario_id(&mut self, id: &str) -> Result<ScenarioId, UnknownScenarioError> {
        let resolved = ScenarioId::lookup(id)?;
        self.select_scenario(resolved);
        Ok(resolved)
    }

    /// Stops the clock, restores baseline readings, clears history, and
    /// returns to the normal scenario.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.state = MetricState::from_baseline(&self.baseline, format_timestamp(&Local::now()));
        self.history.reset();
        self.scenario = ScenarioId::Normal;
        info!("simulation reset");
    }

    /// Processes one delivered tick.
    ///
    /// While idle the tick is ignored. While running, the next state is
    /// computed in full before it replaces the current one, and the history
    /// entry is taken from the freshly advanced state.
    ///
    /// # Returns
    ///
    /// The new state, or `None` if the engine is idle.
    pub fn step(&mut self) -> Option<&MetricState> {
        let tick = self.clock.tick()?;
        let next = advance(
            &self.state,
            &self.baseline,
            self.scenario.profile(),
            &mut self.perturbation,
            &Local::now(),
        );
        self.history.record(next.history_entry());
        self.state = next;
        debug!(
            tick,
            scenario = %self.scenario,
            power_kw = self.state.power_load_kw,
            temperature_c = self.state.temperature_c,
            utilization_pct = self.state.server_utilization_pct,
            "tick processed"
        );
        Some(&self.state)
    }

    /// Delivers `ticks` ticks back-to-back.
    ///
    /// # Returns
    ///
    /// Number of ticks that advanced the state (zero while idle).
    pub fn run_ticks(&mut self, ticks: usize) -> usize {
        (0..ticks).filter(|_| self.step().is_some()).count()
    }

    /// Current readings.
    pub fn current_state(&self) -> &MetricState {
        &self.state
    }

    /// Trend history, oldest first.
    pub fn current_history(&self) -> &HistoryRing {
        &self.history
    }

    /// Static profile of the active scenario.
    pub fn active_scenario(&self) -> &'static Scenario {
        self.scenario.profile()
    }

    /// Id of the active scenario.
    pub fn scenario_id(&self) -> ScenarioId {
        self.scenario
    }

    /// Returns `true` while ticks advance the state.
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// The simulation clock (period, state, tick count).
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Baseline readings used for advance and reset.
    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Clones the state, history, and scenario into one value.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            state: self.state.clone(),
            history: self.history.contents(),
            scenario: self.scenario,
            advisory_alerts: self.scenario.profile().advisory_alerts,
            clock: self.clock.state(),
            ticks: self.clock.ticks(),
        }
    }
}

impl Engine<SeededPerturbation> {
    /// Creates an engine with a reproducible noise source.
    pub fn seeded(settings: EngineSettings, seed: u64) -> Self {
        Self::new(settings, SeededPerturbation::new(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::perturbation::{FixedPerturbation, NoPerturbation};

    fn quiet_engine() -> Engine<NoPerturbation> {
        Engine::new(EngineSettings::default(), NoPerturbation)
    }

    #[test]
    fn new_engine_is_idle_at_baseline() {
        let engine = quiet_engine();
        assert!(!engine.is_running());
        assert_eq!(engine.current_state().power_load_kw, 3200.0);
        assert!(engine.current_history().is_empty());
        assert_eq!(engine.scenario_id(), ScenarioId::Normal);
    }

    #[test]
    fn idle_step_is_ignored() {
        let mut engine = quiet_engine();
        engine.select_scenario(ScenarioId::PeakLoad);
        assert!(engine.step().is_none());
        assert_eq!(engine.current_state().power_load_kw, 3200.0);
        assert!(engine.current_history().is_empty());
    }

    #[test]
    fn history_entry_uses_post_advance_values() {
        let mut engine = quiet_engine();
        engine.select_scenario(ScenarioId::PeakLoad);
        engine.start();
        engine.step();
        let latest = engine.current_history().latest().cloned();
        let latest = latest.expect("one entry recorded");
        // Pre-advance readings would be the 3200 kW / 24.8 °C baseline.
        assert_eq!(latest.power, 4480.0);
        assert_eq!(latest.temperature, 32.2);
        assert_eq!(latest.utilization, 72.0);
        assert_eq!(latest, engine.current_state().history_entry());
    }

    #[test]
    fn select_scenario_does_not_advance_or_clear() {
        let mut engine = quiet_engine();
        engine.start();
        engine.step();
        engine.select_scenario(ScenarioId::CoolingFailure);
        assert_eq!(engine.current_history().len(), 1);
        assert_eq!(engine.current_state().temperature_c, 24.8);
        engine.step();
        assert_eq!(engine.current_state().temperature_c, 35.0);
    }

    #[test]
    fn select_unknown_scenario_keeps_active_one() {
        let mut engine = quiet_engine();
        engine.select_scenario(ScenarioId::PowerOutage);
        assert!(engine.select_scenario_id("tsunami").is_err());
        assert_eq!(engine.scenario_id(), ScenarioId::PowerOutage);
        assert_eq!(engine.select_scenario_id("normal"), Ok(ScenarioId::Normal));
    }

    #[test]
    fn toggle_flips_running() {
        let mut engine = quiet_engine();
        assert!(engine.toggle_running());
        assert!(!engine.toggle_running());
    }

    #[test]
    fn reset_restores_everything() {
        let mut engine = Engine::new(EngineSettings::default(), FixedPerturbation::new(1.0));
        engine.select_scenario(ScenarioId::CoolingFailure);
        engine.start();
        engine.run_ticks(5);
        engine.reset();
        assert!(!engine.is_running());
        assert_eq!(engine.current_state().power_load_kw, 3200.0);
        assert_eq!(engine.current_state().temperature_c, 24.8);
        assert_eq!(engine.current_state().server_utilization_pct, 72.0);
        assert!(engine.current_history().is_empty());
        assert_eq!(engine.scenario_id(), ScenarioId::Normal);
        assert_eq!(engine.clock().ticks(), 0);
    }

    #[test]
    fn run_ticks_counts_only_processed_ticks() {
        let mut engine = quiet_engine();
        assert_eq!(engine.run_ticks(3), 0);
        engine.start();
        assert_eq!(engine.run_ticks(3), 3);
        assert_eq!(engine.clock().ticks(), 3);
    }

    #[test]
    fn snapshot_reflects_active_scenario() {
        let mut engine = quiet_engine();
        engine.select_scenario(ScenarioId::PeakLoad);
        engine.start();
        engine.step();
        let snap = engine.snapshot();
        assert_eq!(snap.scenario, ScenarioId::PeakLoad);
        assert_eq!(snap.advisory_alerts.len(), 2);
        assert_eq!(snap.clock, ClockState::Running);
        assert_eq!(snap.history.len(), 1);
        assert_eq!(snap.ticks, 1);
    }
}
