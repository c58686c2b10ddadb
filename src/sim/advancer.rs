//! Scenario-driven state advance: baseline × bias + noise, clamp, round.

use chrono::{DateTime, Local};

use super::perturbation::Perturbation;
use super::scenario::Scenario;
use super::types::{
    Baseline, MetricState, POWER_LOAD_BOUNDS_KW, TEMPERATURE_BOUNDS_C, UTILIZATION_BOUNDS_PCT,
    format_timestamp,
};

/// Half-width of the uniform power noise (kW).
pub const POWER_JITTER_KW: f32 = 50.0;
/// Half-width of the uniform temperature noise (°C).
pub const TEMPERATURE_JITTER_C: f32 = 0.25;
/// Half-width of the uniform utilization noise (percentage points).
pub const UTILIZATION_JITTER_PCT: f32 = 2.5;

/// Rounds `value` to `decimals` decimal places.
pub fn round_to(value: f32, decimals: i32) -> f32 {
    let factor = 10f32.powi(decimals);
    (value * factor).round() / factor
}

/// Computes the state that follows `current` under `scenario`.
///
/// Power, temperature, and utilization are recomputed from `baseline`, not
/// from `current`, so long runs never random-walk away from the scenario's
/// distribution. Secondary KPIs are carried over from `current`.
///
/// # Arguments
///
/// * `current` - State before the tick
/// * `baseline` - Reference readings
/// * `scenario` - Active bias profile
/// * `perturbation` - Noise source (drawn temperature, power, utilization in that order)
/// * `captured_at` - Wall-clock time stamped onto the result
///
/// # Returns
///
/// A new `MetricState` with every bounded field inside its interval,
/// temperature rounded to one decimal and power/utilization to integers.
pub fn advance<P: Perturbation + ?Sized>(
    current: &MetricState,
    baseline: &Baseline,
    scenario: &Scenario,
    perturbation: &mut P,
    captured_at: &DateTime<Local>,
) -> MetricState {
    let temp_noise = perturbation.sample(TEMPERATURE_JITTER_C);
    let power_noise = perturbation.sample(POWER_JITTER_KW);
    let util_noise = perturbation.sample(UTILIZATION_JITTER_PCT);

    let temperature_c = TEMPERATURE_BOUNDS_C
        .clamp(baseline.temperature_c * scenario.temp_multiplier + temp_noise);
    let power_load_kw =
        POWER_LOAD_BOUNDS_KW.clamp(baseline.power_load_kw * scenario.power_multiplier + power_noise);
    let server_utilization_pct =
        UTILIZATION_BOUNDS_PCT.clamp(baseline.server_utilization_pct + util_noise);

    MetricState {
        power_load_kw: power_load_kw.round(),
        temperature_c: round_to(temperature_c, 1),
        server_utilization_pct: server_utilization_pct.round(),
        timestamp: format_timestamp(captured_at),
        ..current.clone()
    }
    .clamped()
}
