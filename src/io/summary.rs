//! Transposed batch summary: one row per metric, one column per run.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::analysis::BatchReport;

/// Writes the batch summary to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_summary(report: &BatchReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_summary(report, io::BufWriter::new(file))
}

/// Writes the batch summary as CSV to any writer.
///
/// The first row is a blank cell followed by the run labels; every later
/// row is a metric label followed by that metric for each run. Undefined
/// metrics are written as `NaN`.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_summary(report: &BatchReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    let mut header = vec![String::new()];
    header.extend(report.runs.iter().map(|r| r.label.clone()));
    wtr.write_record(&header)?;

    let with_weighted = report.has_weighted();
    let columns: Vec<_> = report
        .runs
        .iter()
        .map(|r| r.metrics.rows(with_weighted))
        .collect();
    let labels = report
        .runs
        .first()
        .map(|r| r.metrics.rows(with_weighted))
        .unwrap_or_default();

    for (row, (label, _)) in labels.iter().enumerate() {
        let mut record = vec![(*label).to_string()];
        record.extend(columns.iter().map(|col| match col[row].1 {
            Some(v) => v.to_string(),
            None => "NaN".to_string(),
        }));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
