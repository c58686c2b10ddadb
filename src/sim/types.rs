//! Core simulation types: metric bounds, baselines, engine settings, and state snapshots.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::scenario::ScenarioId;

/// Closed interval that a metric is saturated into after every update.
///
/// # Examples
///
/// ```
/// use dc_sim::sim::types::Bounds;
///
/// let b = Bounds::new(15.0, 35.0);
/// assert_eq!(b.clamp(44.6), 35.0);
/// assert_eq!(b.clamp(f32::NAN), 15.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower bound (inclusive).
    pub min: f32,
    /// Upper bound (inclusive).
    pub max: f32,
}

impl Bounds {
    /// Creates a new closed interval `[min, max]`.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Saturates `value` at the nearest bound. `NaN` saturates to `min`.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Returns `true` when `value` lies inside the interval.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Facility power draw (kW).
pub const POWER_LOAD_BOUNDS_KW: Bounds = Bounds::new(1000.0, 5000.0);
/// Average ambient temperature (°C).
pub const TEMPERATURE_BOUNDS_C: Bounds = Bounds::new(15.0, 35.0);
/// Aggregate compute utilization (%).
pub const UTILIZATION_BOUNDS_PCT: Bounds = Bounds::new(0.0, 100.0);
/// Power usage effectiveness.
pub const PUE_BOUNDS: Bounds = Bounds::new(1.0, 3.0);
/// UPS load (%).
pub const UPS_LOAD_BOUNDS_PCT: Bounds = Bounds::new(60.0, 95.0);
/// White-space floor area in use (%).
pub const WHITE_SPACE_BOUNDS_PCT: Bounds = Bounds::new(0.0, 100.0);
/// Mean time to repair (hours).
pub const MTTR_BOUNDS_HOURS: Bounds = Bounds::new(0.0, f32::MAX);
/// Chiller efficiency (kW/ton); must stay strictly positive.
pub const CHILLER_EFFICIENCY_BOUNDS: Bounds = Bounds::new(0.05, 2.0);

/// Reference readings the advancer multiplies scenario biases into.
///
/// Also the `[baseline]` section of the TOML configuration; every field
/// defaults to the reference data center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Baseline {
    /// Facility power draw (kW).
    pub power_load_kw: f32,
    /// Average ambient temperature (°C).
    pub temperature_c: f32,
    /// Aggregate compute utilization (%).
    pub server_utilization_pct: f32,
    /// Power usage effectiveness.
    pub pue: f32,
    /// UPS load (%).
    pub ups_load_pct: f32,
    /// White-space floor area in use (%).
    pub white_space_used_pct: f32,
    /// Number of open alarms.
    pub active_alarms: u32,
    /// Mean time to repair (hours).
    pub mttr_hours: f32,
    /// Chiller efficiency (kW/ton).
    pub chiller_efficiency: f32,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            power_load_kw: 3200.0,
            temperature_c: 24.8,
            server_utilization_pct: 72.0,
            pue: 1.42,
            ups_load_pct: 78.0,
            white_space_used_pct: 72.0,
            active_alarms: 3,
            mttr_hours: 4.2,
            chiller_efficiency: 0.68,
        }
    }
}

/// Runtime parameters for constructing an [`Engine`](super::engine::Engine).
///
/// # Examples
///
/// ```
/// use dc_sim::sim::types::EngineSettings;
///
/// let settings = EngineSettings::default();
/// assert_eq!(settings.history_capacity, 20);
/// assert_eq!(settings.tick_period.as_secs(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Baseline readings used for initialisation, reset, and every advance.
    pub baseline: Baseline,
    /// Interval between simulation ticks while running.
    pub tick_period: Duration,
    /// Maximum number of history entries retained.
    pub history_capacity: usize,
    /// Scenario active when the engine is constructed.
    pub initial_scenario: ScenarioId,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            baseline: Baseline::default(),
            tick_period: Duration::from_secs(1),
            history_capacity: 20,
            initial_scenario: ScenarioId::Normal,
        }
    }
}

/// Formats a capture instant the way the dashboard labels its readings.
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// Current operational readings of the simulated data center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricState {
    /// Facility power draw (kW, integer-valued).
    pub power_load_kw: f32,
    /// Average ambient temperature (°C, one decimal).
    pub temperature_c: f32,
    /// Aggregate compute utilization (%, integer-valued).
    pub server_utilization_pct: f32,
    /// Power usage effectiveness.
    pub pue: f32,
    /// UPS load (%).
    pub ups_load_pct: f32,
    /// White-space floor area in use (%).
    pub white_space_used_pct: f32,
    /// Number of open alarms.
    pub active_alarms: u32,
    /// Mean time to repair (hours).
    pub mttr_hours: f32,
    /// Chiller efficiency (kW/ton).
    pub chiller_efficiency: f32,
    /// Human-readable capture time.
    pub timestamp: String,
}

impl MetricState {
    /// Builds a state holding the baseline readings, clamped to their bounds.
    pub fn from_baseline(baseline: &Baseline, timestamp: String) -> Self {
        Self {
            power_load_kw: baseline.power_load_kw,
            temperature_c: baseline.temperature_c,
            server_utilization_pct: baseline.server_utilization_pct,
            pue: baseline.pue,
            ups_load_pct: baseline.ups_load_pct,
            white_space_used_pct: baseline.white_space_used_pct,
            active_alarms: baseline.active_alarms,
            mttr_hours: baseline.mttr_hours,
            chiller_efficiency: baseline.chiller_efficiency,
            timestamp,
        }
        .clamped()
    }

    /// Saturates every bounded field into its declared interval.
    pub fn clamped(mut self) -> Self {
        self.power_load_kw = POWER_LOAD_BOUNDS_KW.clamp(self.power_load_kw);
        self.temperature_c = TEMPERATURE_BOUNDS_C.clamp(self.temperature_c);
        self.server_utilization_pct = UTILIZATION_BOUNDS_PCT.clamp(self.server_utilization_pct);
        self.pue = PUE_BOUNDS.clamp(self.pue);
        self.ups_load_pct = UPS_LOAD_BOUNDS_PCT.clamp(self.ups_load_pct);
        self.white_space_used_pct = WHITE_SPACE_BOUNDS_PCT.clamp(self.white_space_used_pct);
        self.mttr_hours = MTTR_BOUNDS_HOURS.clamp(self.mttr_hours);
        self.chiller_efficiency = CHILLER_EFFICIENCY_BOUNDS.clamp(self.chiller_efficiency);
        self
    }

    /// Returns `true` when every bounded field lies inside its interval.
    pub fn within_bounds(&self) -> bool {
        POWER_LOAD_BOUNDS_KW.contains(self.power_load_kw)
            && TEMPERATURE_BOUNDS_C.contains(self.temperature_c)
            && UTILIZATION_BOUNDS_PCT.contains(self.server_utilization_pct)
            && PUE_BOUNDS.contains(self.pue)
            && UPS_LOAD_BOUNDS_PCT.contains(self.ups_load_pct)
            && WHITE_SPACE_BOUNDS_PCT.contains(self.white_space_used_pct)
            && MTTR_BOUNDS_HOURS.contains(self.mttr_hours)
            && CHILLER_EFFICIENCY_BOUNDS.contains(self.chiller_efficiency)
    }

    /// Snapshot of the trend-chart fields.
    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            time: self.timestamp.clone(),
            power: self.power_load_kw,
            temperature: self.temperature_c,
            utilization: self.server_utilization_pct,
        }
    }
}

impl fmt::Display for MetricState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | power={:>6.0} kW  temp={:>4.1} C  util={:>3.0}% | \
             PUE={:.2}  UPS={:.1}%  space={:.1}%  alarms={}  MTTR={:.1}h  chiller={:.2}",
            self.timestamp,
            self.power_load_kw,
            self.temperature_c,
            self.server_utilization_pct,
            self.pue,
            self.ups_load_pct,
            self.white_space_used_pct,
            self.active_alarms,
            self.mttr_hours,
            self.chiller_efficiency,
        )
    }
}

/// Immutable trend-chart snapshot captured when a tick is processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Capture time label.
    pub time: String,
    /// Power draw (kW).
    pub power: f32,
    /// Ambient temperature (°C).
    pub temperature: f32,
    /// Compute utilization (%).
    pub utilization: f32,
}
