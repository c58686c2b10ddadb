//! Mock floor-plan data: temperature-zone heat map and rack layout.

use serde::Serialize;

use super::advancer::round_to;
use super::perturbation::Perturbation;

/// Zones generated for the default heat map.
pub const DEFAULT_ZONE_COUNT: usize = 48;
/// Racks generated for the default layout.
pub const DEFAULT_RACK_COUNT: usize = 50;

/// Thermal classification of a floor zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    Normal,
    Warm,
    Hot,
    Critical,
}

impl ZoneStatus {
    /// Classifies a zone temperature (°C).
    pub fn classify(temperature_c: f32) -> Self {
        if temperature_c > 32.0 {
            ZoneStatus::Critical
        } else if temperature_c > 30.0 {
            ZoneStatus::Hot
        } else if temperature_c > 27.0 {
            ZoneStatus::Warm
        } else {
            ZoneStatus::Normal
        }
    }
}

/// One cell of the temperature heat map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureZone {
    pub id: usize,
    pub temperature_c: f32,
    pub status: ZoneStatus,
}

/// Occupancy classification of a rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RackStatus {
    Empty,
    Normal,
    Warning,
    Critical,
}

impl RackStatus {
    /// Classifies a rack utilization (%).
    pub fn classify(utilization_pct: f32) -> Self {
        if utilization_pct > 90.0 {
            RackStatus::Critical
        } else if utilization_pct > 75.0 {
            RackStatus::Warning
        } else if utilization_pct < 10.0 {
            RackStatus::Empty
        } else {
            RackStatus::Normal
        }
    }
}

/// One rack of the layout grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rack {
    /// Label such as `R07`.
    pub id: String,
    pub utilization_pct: f32,
    pub status: RackStatus,
}

/// Generates `count` zones with temperatures in `[20, 35]`, one decimal.
///
/// Status is classified from the unrounded reading.
pub fn temperature_zones<P: Perturbation + ?Sized>(
    count: usize,
    perturbation: &mut P,
) -> Vec<TemperatureZone> {
    (0..count)
        .map(|id| {
            let raw = 27.5 + perturbation.sample(7.5);
            TemperatureZone {
                id,
                temperature_c: round_to(raw, 1),
                status: ZoneStatus::classify(raw),
            }
        })
        .collect()
}

/// Generates `count` racks labelled `R01`, `R02`, … with integer utilization in `[0, 100]`.
pub fn rack_layout<P: Perturbation + ?Sized>(count: usize, perturbation: &mut P) -> Vec<Rack> {
    (0..count)
        .map(|i| {
            let raw = 50.0 + perturbation.sample(50.0);
            Rack {
                id: format!("R{:02}", i + 1),
                utilization_pct: raw.round(),
                status: RackStatus::classify(raw),
            }
        })
        .collect()
}
