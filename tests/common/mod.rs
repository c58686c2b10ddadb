//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use dc_sim::sim::engine::Engine;
use dc_sim::sim::perturbation::{NoPerturbation, SeededPerturbation};
use dc_sim::sim::scenario::ScenarioId;
use dc_sim::sim::types::{EngineSettings, MetricState};

/// Seed shared by the reproducibility tests.
pub const SEED: u64 = 42;

/// Default settings (1 s ticks, 20 history entries, normal scenario).
pub fn default_settings() -> EngineSettings {
    EngineSettings::default()
}

/// Idle engine with seeded noise.
pub fn seeded_engine(seed: u64) -> Engine<SeededPerturbation> {
    Engine::seeded(default_settings(), seed)
}

/// Idle engine with zero noise, so every tick lands on `baseline × multiplier`.
pub fn quiet_engine() -> Engine<NoPerturbation> {
    Engine::new(default_settings(), NoPerturbation)
}

/// Runs `ticks` ticks under `scenario` from a fresh start and returns every
/// state the engine produced.
pub fn run_scenario(
    engine: &mut Engine<SeededPerturbation>,
    scenario: ScenarioId,
    ticks: usize,
) -> Vec<MetricState> {
    engine.select_scenario(scenario);
    engine.start();
    (0..ticks)
        .filter_map(|_| engine.step().cloned())
        .collect()
}

/// Mean temperature over a run of states.
pub fn mean_temperature(states: &[MetricState]) -> f32 {
    if states.is_empty() {
        return 0.0;
    }
    states.iter().map(|s| s.temperature_c).sum::<f32>() / states.len() as f32
}
