//! TOML-based simulation configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing_subscriber::filter::EnvFilter;

use crate::logging::LoggingConfig;
use crate::sim::perturbation::SeededPerturbation;
use crate::sim::scenario::ScenarioId;
use crate::sim::types::{
    Baseline, Bounds, CHILLER_EFFICIENCY_BOUNDS, EngineSettings, MTTR_BOUNDS_HOURS,
    POWER_LOAD_BOUNDS_KW, PUE_BOUNDS, TEMPERATURE_BOUNDS_C, UPS_LOAD_BOUNDS_PCT,
    UTILIZATION_BOUNDS_PCT, WHITE_SPACE_BOUNDS_PCT,
};

/// Top-level configuration parsed from TOML.
///
/// Every section is optional and defaults to the reference data center.
/// Load with [`SimulationConfig::from_toml_file`] or start from
/// [`SimulationConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub baseline: Baseline,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tick timing, history size, seeding, and start-up scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Interval between ticks in milliseconds (must be > 0).
    pub tick_period_ms: u64,
    /// Maximum retained history entries (must be > 0).
    pub history_capacity: usize,
    /// Perturbation seed; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Scenario id active at start-up.
    pub initial_scenario: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 1000,
            history_capacity: 20,
            seed: None,
            initial_scenario: ScenarioId::Normal.as_str().to_string(),
        }
    }
}

/// Periods of the dashboard refreshers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RefreshConfig {
    pub live_period_ms: u64,
    pub legacy_period_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            live_period_ms: 5000,
            legacy_period_ms: 30000,
        }
    }
}

/// A configuration problem tied to a dotted field path.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl SimulationConfig {
    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on syntax errors, type mismatches, or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Checks all values and returns every problem found.
    ///
    /// An empty vector means the configuration is usable.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let e = &self.engine;

        if e.tick_period_ms == 0 {
            errors.push(ConfigError::new("engine.tick_period_ms", "must be > 0"));
        }
        if e.history_capacity == 0 {
            errors.push(ConfigError::new("engine.history_capacity", "must be > 0"));
        }
        if let Err(err) = ScenarioId::lookup(&e.initial_scenario) {
            errors.push(ConfigError::new("engine.initial_scenario", err.to_string()));
        }

        let b = &self.baseline;
        let checks: [(&str, f32, Bounds); 8] = [
            ("baseline.power_load_kw", b.power_load_kw, POWER_LOAD_BOUNDS_KW),
            ("baseline.temperature_c", b.temperature_c, TEMPERATURE_BOUNDS_C),
            (
                "baseline.server_utilization_pct",
                b.server_utilization_pct,
                UTILIZATION_BOUNDS_PCT,
            ),
            ("baseline.pue", b.pue, PUE_BOUNDS),
            ("baseline.ups_load_pct", b.ups_load_pct, UPS_LOAD_BOUNDS_PCT),
            (
                "baseline.white_space_used_pct",
                b.white_space_used_pct,
                WHITE_SPACE_BOUNDS_PCT,
            ),
            ("baseline.mttr_hours", b.mttr_hours, MTTR_BOUNDS_HOURS),
            (
                "baseline.chiller_efficiency",
                b.chiller_efficiency,
                CHILLER_EFFICIENCY_BOUNDS,
            ),
        ];
        for (field, value, bounds) in checks {
            if !bounds.contains(value) {
                errors.push(ConfigError::new(
                    field,
                    format!("must be in [{}, {}], got {value}", bounds.min, bounds.max),
                ));
            }
        }

        let r = &self.refresh;
        if r.live_period_ms == 0 {
            errors.push(ConfigError::new("refresh.live_period_ms", "must be > 0"));
        }
        if r.legacy_period_ms == 0 {
            errors.push(ConfigError::new("refresh.legacy_period_ms", "must be > 0"));
        }

        if let Err(err) = EnvFilter::try_new(&self.logging.level) {
            errors.push(ConfigError::new("logging.level", err.to_string()));
        }

        errors
    }

    /// Interval between simulation ticks.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.engine.tick_period_ms)
    }

    /// Period of the live dashboard refresher.
    pub fn live_period(&self) -> Duration {
        Duration::from_millis(self.refresh.live_period_ms)
    }

    /// Period of the legacy dashboard refresher.
    pub fn legacy_period(&self) -> Duration {
        Duration::from_millis(self.refresh.legacy_period_ms)
    }

    /// Builds engine settings from the `[engine]` and `[baseline]` sections.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the initial scenario is not in the catalog.
    pub fn engine_settings(&self) -> Result<EngineSettings, ConfigError> {
        let initial_scenario = ScenarioId::lookup(&self.engine.initial_scenario)
            .map_err(|e| ConfigError::new("engine.initial_scenario", e.to_string()))?;
        Ok(EngineSettings {
            baseline: self.baseline.clone(),
            tick_period: self.tick_period(),
            history_capacity: self.engine.history_capacity,
            initial_scenario,
        })
    }

    /// Perturbation source for the engine: seeded when `engine.seed` is set,
    /// otherwise drawn from OS entropy.
    pub fn perturbation(&self) -> SeededPerturbation {
        self.perturbation_with_offset(0)
    }

    /// Like [`perturbation`](Self::perturbation) but offsets the seed, so
    /// the dashboard feeds do not replay the engine's noise.
    pub fn perturbation_with_offset(&self, offset: u64) -> SeededPerturbation {
        match self.engine.seed {
            Some(seed) => SeededPerturbation::new(seed.wrapping_add(offset)),
            None => SeededPerturbation::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;

    #[test]
    fn default_config_valid() {
        let cfg = SimulationConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn shipped_default_file_matches_builtin_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/default.toml");
        let cfg = SimulationConfig::from_toml_file(&path).expect("configs/default.toml should load");
        let builtin = SimulationConfig::default();
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.baseline, builtin.baseline);
        assert_eq!(cfg.logging, builtin.logging);
        assert_eq!(cfg.tick_period(), builtin.tick_period());
        assert_eq!(cfg.live_period(), builtin.live_period());
        assert_eq!(cfg.legacy_period(), builtin.legacy_period());
        assert_eq!(cfg.engine.history_capacity, builtin.engine.history_capacity);
        assert_eq!(cfg.engine.initial_scenario, builtin.engine.initial_scenario);
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg = SimulationConfig::from_toml_str("").ok();
        assert_eq!(cfg.as_ref().map(|c| c.engine.history_capacity), Some(20));
        assert_eq!(cfg.as_ref().map(|c| c.baseline.power_load_kw), Some(3200.0));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[engine]
tick_period_ms = 250
history_capacity = 50
seed = 7
initial_scenario = "peak-load"

[baseline]
power_load_kw = 3000.0
temperature_c = 23.5

[refresh]
live_period_ms = 1000

[logging]
level = "debug"
format = "json"
"#;
        let cfg = SimulationConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let Ok(cfg) = cfg else { return };
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.tick_period(), Duration::from_millis(250));
        assert_eq!(cfg.engine.seed, Some(7));
        assert_eq!(cfg.baseline.server_utilization_pct, 72.0);
        assert_eq!(cfg.refresh.legacy_period_ms, 30000);
        assert_eq!(cfg.logging.format, LogFormat::Json);

        let settings = cfg.engine_settings().ok();
        assert_eq!(
            settings.map(|s| s.initial_scenario),
            Some(ScenarioId::PeakLoad)
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[engine]
tick_period_ms = 1000
bogus_field = true
"#;
        assert!(SimulationConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(SimulationConfig::from_toml_str("[solar]\nkw_peak = 5.0\n").is_err());
    }

    #[test]
    fn validation_catches_zero_period_and_capacity() {
        let mut cfg = SimulationConfig::default();
        cfg.engine.tick_period_ms = 0;
        cfg.engine.history_capacity = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "engine.tick_period_ms"));
        assert!(errors.iter().any(|e| e.field == "engine.history_capacity"));
    }

    #[test]
    fn validation_catches_unknown_scenario() {
        let mut cfg = SimulationConfig::default();
        cfg.engine.initial_scenario = "meteor-strike".into();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "engine.initial_scenario"));
        assert!(cfg.engine_settings().is_err());
    }

    #[test]
    fn validation_catches_out_of_range_baseline() {
        let mut cfg = SimulationConfig::default();
        cfg.baseline.ups_load_pct = 99.0;
        cfg.baseline.chiller_efficiency = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "baseline.ups_load_pct"));
        assert!(errors.iter().any(|e| e.field == "baseline.chiller_efficiency"));
    }

    #[test]
    fn validation_catches_zero_refresh_period() {
        let mut cfg = SimulationConfig::default();
        cfg.refresh.legacy_period_ms = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "refresh.legacy_period_ms"));
    }

    #[test]
    fn error_display_names_field() {
        let e = ConfigError::new("engine.tick_period_ms", "must be > 0");
        assert_eq!(e.to_string(), "config error: engine.tick_period_ms: must be > 0");
    }

    #[test]
    fn seeded_perturbation_is_reproducible() {
        use crate::sim::perturbation::Perturbation;

        let mut cfg = SimulationConfig::default();
        cfg.engine.seed = Some(5);
        let mut a = cfg.perturbation();
        let mut b = cfg.perturbation();
        assert_eq!(a.sample(1.0), b.sample(1.0));
    }

    #[test]
    fn from_missing_file_fails() {
        let err = SimulationConfig::from_toml_file(Path::new("/nonexistent/dc-sim.toml"));
        assert!(err.is_err_and(|e| e.field == "config"));
    }
}
