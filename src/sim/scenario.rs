//! Fixed catalog of failure scenarios and their bias profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a built-in scenario.
///
/// The set is closed: every consumer matches exhaustively, so adding a
/// scenario is a compile-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioId {
    /// Standard operational parameters.
    #[default]
    Normal,
    /// High computational demand.
    PeakLoad,
    /// Partial cooling system failure.
    CoolingFailure,
    /// Grid power failure, running on UPS.
    PowerOutage,
}

/// Static bias profile applied to baseline readings on every tick.
#[derive(Debug, Serialize)]
pub struct Scenario {
    /// Registry key.
    pub id: ScenarioId,
    /// Display name.
    pub name: &'static str,
    /// One-line display description.
    pub description: &'static str,
    /// Factor applied to baseline power draw.
    pub power_multiplier: f32,
    /// Factor applied to baseline temperature.
    pub temp_multiplier: f32,
    /// Advisory labels shown while the scenario is active.
    pub advisory_alerts: &'static [&'static str],
}

static NORMAL: Scenario = Scenario {
    id: ScenarioId::Normal,
    name: "Normal Operations",
    description: "Standard operational parameters",
    power_multiplier: 1.0,
    temp_multiplier: 1.0,
    advisory_alerts: &[],
};

static PEAK_LOAD: Scenario = Scenario {
    id: ScenarioId::PeakLoad,
    name: "Peak Load Scenario",
    description: "High computational demand",
    power_multiplier: 1.4,
    temp_multiplier: 1.3,
    advisory_alerts: &["High power consumption", "Elevated temperature"],
};

static COOLING_FAILURE: Scenario = Scenario {
    id: ScenarioId::CoolingFailure,
    name: "Cooling System Failure",
    description: "Partial cooling system failure",
    power_multiplier: 1.1,
    temp_multiplier: 1.8,
    advisory_alerts: &["Critical: Cooling failure", "Temperature rising"],
};

static POWER_OUTAGE: Scenario = Scenario {
    id: ScenarioId::PowerOutage,
    name: "Power Outage",
    description: "Grid power failure, running on UPS",
    power_multiplier: 0.8,
    temp_multiplier: 1.2,
    advisory_alerts: &["Power outage detected", "Running on backup power"],
};

/// Requested scenario id is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scenario \"{id}\", available: normal, peak-load, cooling-failure, power-outage")]
pub struct UnknownScenarioError {
    /// The id that failed to resolve.
    pub id: String,
}

impl ScenarioId {
    /// All scenarios in display order.
    pub const ALL: [ScenarioId; 4] = [
        ScenarioId::Normal,
        ScenarioId::PeakLoad,
        ScenarioId::CoolingFailure,
        ScenarioId::PowerOutage,
    ];

    /// Registry key, e.g. `"peak-load"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioId::Normal => "normal",
            ScenarioId::PeakLoad => "peak-load",
            ScenarioId::CoolingFailure => "cooling-failure",
            ScenarioId::PowerOutage => "power-outage",
        }
    }

    /// Returns the static profile for this scenario.
    pub fn profile(self) -> &'static Scenario {
        match self {
            ScenarioId::Normal => &NORMAL,
            ScenarioId::PeakLoad => &PEAK_LOAD,
            ScenarioId::CoolingFailure => &COOLING_FAILURE,
            ScenarioId::PowerOutage => &POWER_OUTAGE,
        }
    }

    /// Resolves a registry key.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownScenarioError`] if `id` is not one of the four
    /// catalog keys. Unknown ids are never mapped to a default.
    pub fn lookup(id: &str) -> Result<Self, UnknownScenarioError> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == id)
            .ok_or_else(|| UnknownScenarioError { id: id.to_string() })
    }
}

impl FromStr for ScenarioId {
    type Err = UnknownScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
