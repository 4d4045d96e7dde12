//! Per-run detail CSV export.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::analysis::StepRecord;
use crate::config::with_csv_extension;

/// Column header for the per-timestep detail export.
const HEADER: &str = "timestep,time_hr,timestamp,indoor_c,outdoor_c,occupancy,\
                      occupancy_probability,lower_100_c,upper_100_c,lower_90_c,upper_90_c,\
                      lower_80_c,upper_80_c,lower_weighted_c,upper_weighted_c,\
                      in_100,in_90,in_80,in_weighted,occupied_in_90,occupied_in_80,\
                      deviation_c,percent_comfortable,heating_setpoint_c,cooling_setpoint_c,\
                      heating_kwh,cooling_kwh,facility_kwh,price_per_kwh,cost";

/// Detail export path for a run: the input's stem, `_`, then `suffix`,
/// next to the input file.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use comfort_cost::io::export::detail_path;
///
/// let p = detail_path(Path::new("runs/baseline.csv"), "comfort");
/// assert_eq!(p, Path::new("runs/baseline_comfort.csv"));
/// ```
pub fn detail_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}_{}", with_csv_extension(suffix));
    match source.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Exports a run's step records to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[StepRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes step records as CSV to any writer. Absent optional values are
/// left blank; flags are written as 0/1.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[StepRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.timestep.to_string(),
            format!("{:.4}", r.time_hr),
            r.timestamp.clone(),
            format!("{:.3}", r.indoor_c),
            format!("{:.3}", r.outdoor_c),
            flag(r.occupied),
            optional(r.occupancy_probability),
            format!("{:.4}", r.full_lower_c),
            format!("{:.4}", r.full_upper_c),
            format!("{:.4}", r.ninety_lower_c),
            format!("{:.4}", r.ninety_upper_c),
            format!("{:.4}", r.eighty_lower_c),
            format!("{:.4}", r.eighty_upper_c),
            optional(r.weighted_lower_c),
            optional(r.weighted_upper_c),
            flag(r.in_full),
            flag(r.in_ninety),
            flag(r.in_eighty),
            r.in_weighted.map(flag).unwrap_or_default(),
            flag(r.occupied_in_ninety),
            flag(r.occupied_in_eighty),
            format!("{:.4}", r.deviation_c),
            format!("{:.4}", r.percent_comfortable),
            optional(r.heating_setpoint_c),
            optional(r.cooling_setpoint_c),
            format!("{:.6}", r.heating_kwh),
            format!("{:.6}", r.cooling_kwh),
            format!("{:.6}", r.facility_kwh),
            format!("{:.6}", r.price_per_kwh),
            format!("{:.6}", r.cost),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn flag(value: bool) -> String {
    u8::from(value).to_string()
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}
