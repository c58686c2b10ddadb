//! CSV export of recorded history entries.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::sim::types::HistoryEntry;

/// Column header of the history CSV.
const HEADER: [&str; 4] = ["time", "power_kw", "temperature_c", "utilization_pct"];

/// Failure while writing a history export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write history export: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode history row: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes history entries as CSV to a file at `path`.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn export_history_csv(entries: &[HistoryEntry], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_history_csv(entries, io::BufWriter::new(file))
}

/// Writes history entries as CSV to any writer, oldest first.
///
/// # Errors
///
/// Returns [`ExportError`] if writing fails.
pub fn write_history_csv(entries: &[HistoryEntry], writer: impl Write) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER)?;
    for e in entries {
        wtr.write_record(&[
            e.time.clone(),
            format!("{:.0}", e.power),
            format!("{:.1}", e.temperature),
            format!("{:.0}", e.utilization),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
