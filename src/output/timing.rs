use std::path::Path;

use crate::error::{HarnessError, Result};

pub const TIME_MEASUREMENT_FILE: &str = "time_measurement.txt";

/// Item of the time measurement file covering the whole run.
const TOTAL_ITEM: &str = "total";

/// Returns the total duration of a simulation, in seconds.
///
/// `time_measurement.txt` holds `#`-commented, tab-separated
/// `<item> <duration_ms> <occurrences>` rows.
///
/// # Errors
///
/// Returns [`HarnessError::VariableNotFound`] if there is no `total` row, or
/// an I/O or format error if the file cannot be read.
pub fn simulation_time(output_dir: &Path) -> Result<f64> {
    let path = output_dir.join(TIME_MEASUREMENT_FILE);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
        .map_err(|e| HarnessError::csv(&path, e))?;

    for record in reader.records() {
        let record = record.map_err(|e| HarnessError::csv(&path, e))?;
        if record.get(0).map(str::trim) != Some(TOTAL_ITEM) {
            continue;
        }
        let raw = record.get(1).unwrap_or("").trim();
        let millis = raw
            .parse::<f64>()
            .map_err(|_| HarnessError::format(&path, format!("bad duration \"{raw}\"")))?;
        return Ok(millis / 1000.0);
    }
    Err(HarnessError::VariableNotFound(TOTAL_ITEM.to_string()))
}
