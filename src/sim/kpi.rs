//! Post-hoc statistics over recorded history entries.

use std::fmt;

use serde::Serialize;

use super::types::HistoryEntry;

/// Aggregate figures derived from a run of history entries.
///
/// Computed post-hoc from `&[HistoryEntry]` so the summary always agrees
/// with what the trend chart shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySummary {
    /// Number of entries summarised.
    pub entries: usize,
    /// Mean power draw (kW).
    pub mean_power_kw: f32,
    /// Minimum power draw (kW).
    pub min_power_kw: f32,
    /// Peak power draw (kW).
    pub peak_power_kw: f32,
    /// Mean ambient temperature (°C).
    pub mean_temperature_c: f32,
    /// Peak ambient temperature (°C).
    pub peak_temperature_c: f32,
    /// Mean compute utilization (%).
    pub mean_utilization_pct: f32,
}

impl HistorySummary {
    /// Computes all figures from the given entries.
    ///
    /// # Returns
    ///
    /// A zeroed summary when `entries` is empty.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>) -> Self {
        let mut count = 0_usize;
        let mut power_sum = 0.0_f64;
        let mut temp_sum = 0.0_f64;
        let mut util_sum = 0.0_f64;
        let mut min_power = f32::INFINITY;
        let mut peak_power = f32::NEG_INFINITY;
        let mut peak_temp = f32::NEG_INFINITY;

        for e in entries {
            count += 1;
            power_sum += f64::from(e.power);
            temp_sum += f64::from(e.temperature);
            util_sum += f64::from(e.utilization);
            min_power = min_power.min(e.power);
            peak_power = peak_power.max(e.power);
            peak_temp = peak_temp.max(e.temperature);
        }

        if count == 0 {
            return Self::default();
        }

        let n = count as f64;
        Self {
            entries: count,
            mean_power_kw: (power_sum / n) as f32,
            min_power_kw: min_power,
            peak_power_kw: peak_power,
            mean_temperature_c: (temp_sum / n) as f32,
            peak_temperature_c: peak_temp,
            mean_utilization_pct: (util_sum / n) as f32,
        }
    }
}

impl fmt::Display for HistorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- History Summary ---")?;
        writeln!(f, "History entries:       {}", self.entries)?;
        writeln!(f, "Mean power:            {:.1} kW", self.mean_power_kw)?;
        writeln!(
            f,
            "Power range:           {:.0} - {:.0} kW",
            self.min_power_kw, self.peak_power_kw
        )?;
        writeln!(f, "Mean temperature:      {:.2} C", self.mean_temperature_c)?;
        writeln!(f, "Peak temperature:      {:.1} C", self.peak_temperature_c)?;
        write!(f, "Mean utilization:      {:.1} %", self.mean_utilization_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(power: f32, temperature: f32, utilization: f32) -> HistoryEntry {
        HistoryEntry {
            time: String::new(),
            power,
            temperature,
            utilization,
        }
    }

    #[test]
    fn means_and_extremes() {
        let entries = [
            entry(3000.0, 24.0, 70.0),
            entry(3400.0, 26.0, 74.0),
            entry(3200.0, 25.0, 72.0),
        ];
        let s = HistorySummary::from_entries(&entries);
        assert_eq!(s.entries, 3);
        assert!((s.mean_power_kw - 3200.0).abs() < 1e-3);
        assert_eq!(s.min_power_kw, 3000.0);
        assert_eq!(s.peak_power_kw, 3400.0);
        assert!((s.mean_temperature_c - 25.0).abs() < 1e-4);
        assert_eq!(s.peak_temperature_c, 26.0);
        assert!((s.mean_utilization_pct - 72.0).abs() < 1e-4);
    }

    #[test]
    fn empty_history() {
        let s = HistorySummary::from_entries(&Vec::<HistoryEntry>::new());
        assert_eq!(s, HistorySummary::default());
        assert_eq!(s.entries, 0);
    }

    #[test]
    fn display_lists_entry_count() {
        let s = HistorySummary::from_entries(&[entry(3200.0, 24.8, 72.0)]);
        assert!(format!("{s}").contains("History entries:       1"));
    }
}
