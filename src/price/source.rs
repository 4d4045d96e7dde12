//! Per-timestep electricity prices built once per batch.

use std::ops::Range;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use thiserror::Error;
use tracing::{debug, info};

use super::cost::CostError;
use crate::config::{PriceConfig, PriceMode};
use crate::series::{ResampleError, ValueFileError, read_values, upsample_nearest};

/// Failure building the batch price series.
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("price source: {0}")]
    Read(#[from] ValueFileError),
    #[error("price source: {0}")]
    Resample(#[from] ResampleError),
    #[error("price workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },
    #[error("price workbook {path}, sheet {sheet:?}, row {row}: {value:?} is not a number")]
    BadCell {
        path: PathBuf,
        sheet: String,
        row: usize,
        value: String,
    },
}

/// Converts a wholesale market price to the retail price charged per kWh.
///
/// # Examples
///
/// ```
/// use comfort_cost::price::market_to_retail;
///
/// assert!((market_to_retail(25.0, 4.0, 0.10) - 0.2).abs() < 1e-12);
/// ```
pub fn market_to_retail(market_price: f64, multiplier: f64, offset: f64) -> f64 {
    market_price * multiplier / 1000.0 + offset
}

/// Retail electricity price per timestep ($/kWh), shared read-only by all runs.
///
/// Index 0 is the first timestep after the calibration rows, matching the
/// re-indexed run tables.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    per_kwh: Vec<f64>,
}

impl PriceSeries {
    /// Loads and converts the price file selected by `cfg.mode`.
    ///
    /// Market files are upsampled from `native_resolution_minutes` to the
    /// simulation timestep; legacy and market prices go through
    /// [`market_to_retail`]; tariff files are used as is.
    ///
    /// # Errors
    ///
    /// Returns a `PriceError` if the file or legacy sheet cannot be read or
    /// the market resolution is not an integer multiple of the timestep.
    pub fn load(cfg: &PriceConfig, timestep_minutes: usize) -> Result<Self, PriceError> {
        let path = cfg.source_path();
        let raw = match cfg.mode {
            PriceMode::Legacy => read_sheet(&path, &cfg.date_range)?,
            _ => read_values(&path, 0)?,
        };
        let series = Self::from_raw(cfg, raw, timestep_minutes)?;
        info!(
            mode = %cfg.mode,
            source = %path.display(),
            steps = series.len(),
            "price series loaded"
        );
        Ok(series)
    }

    /// Builds the series from already-read raw values.
    ///
    /// # Errors
    ///
    /// Returns a `PriceError` on an unsupported market resolution.
    pub fn from_raw(
        cfg: &PriceConfig,
        raw: Vec<f64>,
        timestep_minutes: usize,
    ) -> Result<Self, PriceError> {
        let per_kwh = match cfg.mode {
            PriceMode::Tariff => raw,
            PriceMode::Legacy => raw
                .iter()
                .map(|&p| market_to_retail(p, cfg.multiplier, cfg.offset))
                .collect(),
            PriceMode::DayAhead | PriceMode::RealTime => {
                let fine = upsample_nearest(&raw, cfg.native_resolution_minutes, timestep_minutes)?;
                debug!(
                    native = raw.len(),
                    upsampled = fine.len(),
                    "market prices upsampled"
                );
                fine.iter()
                    .map(|&p| market_to_retail(p, cfg.multiplier, cfg.offset))
                    .collect()
            }
        };
        Ok(Self { per_kwh })
    }

    /// Wraps prices that are already in $/kWh.
    pub fn from_per_kwh(per_kwh: Vec<f64>) -> Self {
        Self { per_kwh }
    }

    /// Prices for the timesteps in `range`.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::ShortSource`] if the series ends before the window does.
    pub fn window(&self, range: Range<usize>) -> Result<&[f64], CostError> {
        self.per_kwh
            .get(range.clone())
            .ok_or(CostError::ShortSource {
                series: "price",
                needed: range.end,
                available: self.per_kwh.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.per_kwh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_kwh.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.per_kwh
    }
}

/// Reads the first column of worksheet `sheet` in a price workbook.
///
/// Leading rows that are not numeric (titles, headers) are skipped; after the
/// first number, an empty cell ends the column.
///
/// # Errors
///
/// Returns [`PriceError::Workbook`] if the workbook cannot be opened or has no
/// such sheet, and [`PriceError::BadCell`] on text below the first number.
pub fn read_sheet(path: &Path, sheet: &str) -> Result<Vec<f64>, PriceError> {
    let workbook_err = |source| PriceError::Workbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    let range = workbook.worksheet_range(sheet).map_err(workbook_err)?;

    let mut values = Vec::with_capacity(range.height());
    for (row, cells) in range.rows().enumerate() {
        let cell = cells.first().unwrap_or(&Data::Empty);
        let value = match cell {
            Data::Float(v) => Some(*v),
            Data::Int(v) => Some(*v as f64),
            Data::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match value {
            Some(v) => values.push(v),
            None if values.is_empty() => continue,
            None if matches!(cell, Data::Empty) => break,
            None => {
                return Err(PriceError::BadCell {
                    path: path.to_path_buf(),
                    sheet: sheet.to_string(),
                    row: row + 1,
                    value: cell.to_string(),
                });
            }
        }
    }
    debug!(sheet, rows = values.len(), "legacy price sheet read");
    Ok(values)
}
