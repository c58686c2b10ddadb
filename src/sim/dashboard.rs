//! Coarse KPI refreshers that feed the overview tiles.
//!
//! Unlike the simulation advancer these drift from the previous reading,
//! and each runs on its own period independent of the simulation tick.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::perturbation::Perturbation;
use super::types::{
    Baseline, Bounds, MetricState, POWER_LOAD_BOUNDS_KW, TEMPERATURE_BOUNDS_C,
    UPS_LOAD_BOUNDS_PCT, format_timestamp,
};

const LEGACY_POWER_BOUNDS_KW: Bounds = Bounds::new(2800.0, 3600.0);
const LEGACY_TEMPERATURE_BOUNDS_C: Bounds = Bounds::new(22.0, 28.0);
const LEGACY_UPS_LOAD_BOUNDS_PCT: Bounds = Bounds::new(65.0, 85.0);

/// Drift rule and default period of a dashboard refresher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshProfile {
    /// Overview tiles, refreshed every 5 seconds.
    Live,
    /// Standalone page, refreshed every 30 seconds with tighter bounds.
    Legacy,
}

impl RefreshProfile {
    /// Period used when the configuration does not override it.
    pub fn default_period(self) -> Duration {
        match self {
            RefreshProfile::Live => Duration::from_secs(5),
            RefreshProfile::Legacy => Duration::from_secs(30),
        }
    }

    /// Applies one drift step to `current`.
    ///
    /// Power, temperature, and UPS load move by bounded noise from their
    /// previous value and are clamped to the profile's intervals; every
    /// other field is carried over and clamped to its global bounds.
    pub fn refresh<P: Perturbation + ?Sized>(
        self,
        current: &MetricState,
        perturbation: &mut P,
        captured_at: &DateTime<Local>,
    ) -> MetricState {
        let mut next = current.clone();
        match self {
            RefreshProfile::Live => {
                next.power_load_kw =
                    POWER_LOAD_BOUNDS_KW.clamp(current.power_load_kw + perturbation.sample(50.0));
                next.temperature_c =
                    TEMPERATURE_BOUNDS_C.clamp(current.temperature_c + perturbation.sample(0.1));
                next.ups_load_pct =
                    UPS_LOAD_BOUNDS_PCT.clamp(current.ups_load_pct + perturbation.sample(1.0));
            }
            RefreshProfile::Legacy => {
                next.power_load_kw = LEGACY_POWER_BOUNDS_KW
                    .clamp(current.power_load_kw + perturbation.sample(50.0));
                next.temperature_c = LEGACY_TEMPERATURE_BOUNDS_C
                    .clamp(current.temperature_c + perturbation.sample(0.25));
                next.ups_load_pct = LEGACY_UPS_LOAD_BOUNDS_PCT
                    .clamp(current.ups_load_pct + perturbation.sample(2.0).floor());
            }
        }
        next.timestamp = format_timestamp(captured_at);
        next.clamped()
    }
}

/// A refresher owning its own readings and noise source.
#[derive(Debug)]
pub struct DashboardFeed<P> {
    profile: RefreshProfile,
    period: Duration,
    state: MetricState,
    perturbation: P,
    refreshes: u64,
}

impl<P: Perturbation> DashboardFeed<P> {
    /// Creates a feed starting from the baseline readings, using the
    /// profile's default period.
    pub fn new(profile: RefreshProfile, baseline: &Baseline, perturbation: P) -> Self {
        Self::with_period(profile, profile.default_period(), baseline, perturbation)
    }

    /// Creates a feed with an explicit period.
    pub fn with_period(
        profile: RefreshProfile,
        period: Duration,
        baseline: &Baseline,
        perturbation: P,
    ) -> Self {
        Self {
            profile,
            period,
            state: MetricState::from_baseline(baseline, format_timestamp(&Local::now())),
            perturbation,
            refreshes: 0,
        }
    }

    /// Applies one refresh and returns the new readings.
    pub fn refresh(&mut self) -> &MetricState {
        self.state = self
            .profile
            .refresh(&self.state, &mut self.perturbation, &Local::now());
        self.refreshes += 1;
        &self.state
    }

    /// Latest readings.
    pub fn state(&self) -> &MetricState {
        &self.state
    }

    /// Drift rule in use.
    pub fn profile(&self) -> RefreshProfile {
        self.profile
    }

    /// Interval between refreshes.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Refreshes applied so far.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}
