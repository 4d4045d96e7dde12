//! Loads a raw simulation table into an aligned, windowed run dataset.

use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Range;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{InputConfig, WindowConfig};

/// Failure turning a simulation table into a [`RunDataset`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file \"{0}\" does not exist")]
    NotFound(PathBuf),
    #[error("cannot open \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),
    #[error("column \"{0}\" not found in table header")]
    MissingColumn(String),
    #[error("line {line}, column \"{column}\": cannot parse \"{value}\" as a number")]
    Parse {
        line: usize,
        column: String,
        value: String,
    },
    #[error("window needs {needed} timesteps after calibration rows, table has {available}")]
    ShortSeries { needed: usize, available: usize },
}

/// One simulation run's series, trimmed to the analysis window.
///
/// Every series has the same length; index 0 is the first timestep of the
/// window. Immutable once built.
#[derive(Debug, Clone)]
pub struct RunDataset {
    /// Human-readable run identifier (the source file name).
    pub label: String,
    /// Path the table was read from.
    pub source: PathBuf,
    /// Timestep index of the window start on the re-indexed table.
    pub window_start: usize,
    pub timestamps: Vec<String>,
    pub outdoor_c: Vec<f64>,
    pub indoor_c: Vec<f64>,
    pub heating_energy_j: Vec<f64>,
    pub cooling_energy_j: Vec<f64>,
    pub facility_energy_j: Vec<f64>,
    pub heating_setpoint_c: Option<Vec<f64>>,
    pub cooling_setpoint_c: Option<Vec<f64>>,
    /// Hours since the window start, evenly spaced over the window span.
    pub time_hr: Vec<f64>,
}

impl RunDataset {
    /// Parses a table from any reader.
    ///
    /// Drops the first `calibration_rows` data rows, re-indexes the remainder
    /// from zero, and keeps the timesteps inside `window`.
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` if a required column is missing, a value does
    /// not parse, or the table is too short for the window.
    pub fn from_reader(
        label: impl Into<String>,
        reader: impl Read,
        input: &InputConfig,
        window: &WindowConfig,
    ) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require =
            |name: &str| find(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()));

        let cols = &input.columns;
        let ts_idx = require(&cols.timestamp)?;
        let numeric = [
            (require(&cols.outdoor_temperature)?, cols.outdoor_temperature.as_str()),
            (require(&cols.indoor_temperature)?, cols.indoor_temperature.as_str()),
            (require(&cols.heating_energy)?, cols.heating_energy.as_str()),
            (require(&cols.cooling_energy)?, cols.cooling_energy.as_str()),
            (require(&cols.facility_energy)?, cols.facility_energy.as_str()),
        ];
        let setpoints = [
            find(&cols.heating_setpoint).map(|i| (i, cols.heating_setpoint.as_str())),
            find(&cols.cooling_setpoint).map(|i| (i, cols.cooling_setpoint.as_str())),
        ];

        let range = window.step_range();
        // sized by the rows actually read; the window may exceed the table
        let mut timestamps = Vec::new();
        let mut series: [Vec<f64>; 5] = Default::default();
        let mut setpoint_series: [Option<Vec<f64>>; 2] = setpoints.map(|s| s.map(|_| Vec::new()));
        let mut seen = 0_usize;

        for (row, record) in rdr.records().enumerate().skip(input.calibration_rows) {
            let record = record?;
            let step = row - input.calibration_rows;
            seen = step + 1;
            if step < range.start {
                continue;
            }
            if step >= range.end {
                break;
            }
            // header occupies line 1
            let line = row + 2;

            timestamps.push(record.get(ts_idx).unwrap_or_default().to_string());
            for ((idx, name), out) in numeric.iter().zip(series.iter_mut()) {
                out.push(parse_field(&record, *idx, name, line)?);
            }
            for (spec, out) in setpoints.iter().zip(setpoint_series.iter_mut()) {
                if let (Some((idx, name)), Some(out)) = (spec, out.as_mut()) {
                    out.push(parse_field(&record, *idx, name, line)?);
                }
            }
        }

        if timestamps.len() < range.len() {
            return Err(LoadError::ShortSeries {
                needed: range.end,
                available: seen,
            });
        }

        let [outdoor_c, indoor_c, heating_energy_j, cooling_energy_j, facility_energy_j] = series;
        let [heating_setpoint_c, cooling_setpoint_c] = setpoint_series;
        let time_hr = hours_axis(range.len(), 24.0 * window.day_count() as f64);

        Ok(Self {
            label: label.into(),
            source: PathBuf::new(),
            window_start: range.start,
            timestamps,
            outdoor_c,
            indoor_c,
            heating_energy_j,
            cooling_energy_j,
            facility_energy_j,
            heating_setpoint_c,
            cooling_setpoint_c,
            time_hr,
        })
    }

    /// Number of timesteps in the window.
    pub fn len(&self) -> usize {
        self.indoor_c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indoor_c.is_empty()
    }

    /// Window position on the re-indexed table, for slicing shared sources.
    pub fn step_range(&self) -> Range<usize> {
        self.window_start..self.window_start + self.len()
    }
}

/// Reads and windows one run table from disk.
///
/// # Errors
///
/// Returns [`LoadError::NotFound`] when the file does not exist, so the
/// caller can skip the run, or any error from [`RunDataset::from_reader`].
pub fn load_run(
    path: &Path,
    input: &InputConfig,
    window: &WindowConfig,
) -> Result<RunDataset, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut dataset = RunDataset::from_reader(label, BufReader::new(file), input, window)?;
    dataset.source = path.to_path_buf();
    Ok(dataset)
}

/// `samples` evenly spaced hour values from 0 to `span_hours` inclusive.
///
/// # Examples
///
/// ```
/// use comfort_cost::series::hours_axis;
///
/// assert_eq!(hours_axis(5, 2.0), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
/// ```
pub fn hours_axis(samples: usize, span_hours: f64) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let step = span_hours / (n - 1) as f64;
            (0..n).map(|i| i as f64 * step).collect()
        }
    }
}

fn parse_field(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    line: usize,
) -> Result<f64, LoadError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse::<f64>().map_err(|_| LoadError::Parse {
        line,
        column: column.to_string(),
        value: raw.to_string(),
    })
}
