//! Shared test fixtures for integration tests.
//!
//! Every fixture writes synthetic EnergyPlus-style run tables, price files
//! and occupancy files into its own temporary directory.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use comfort_cost::config::{AnalysisConfig, ColumnConfig, PriceMode};
use tempfile::TempDir;

/// Warm-up rows written at the top of each run table.
pub const CALIBRATION_ROWS: usize = 12;
/// Five-minute timesteps in one day.
pub const STEPS_PER_DAY: usize = 288;

/// Constant per-timestep conditions for a synthetic run.
#[derive(Debug, Clone, Copy)]
pub struct RunSpec {
    pub outdoor_c: f64,
    pub indoor_c: f64,
    pub heating_j: f64,
    pub cooling_j: f64,
    pub facility_j: f64,
}

impl Default for RunSpec {
    fn default() -> Self {
        Self {
            outdoor_c: 20.0,
            indoor_c: 21.0,
            heating_j: 3.0e5,
            cooling_j: 0.0,
            facility_j: 9.0e5,
        }
    }
}

/// Temporary working directory holding one batch's files.
pub struct Fixture {
    pub dir: TempDir,
    pub days: usize,
}

impl Fixture {
    pub fn new(days: usize) -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            days,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn steps(&self) -> usize {
        self.days * STEPS_PER_DAY
    }

    /// Writes a run table with calibration rows whose values are deliberately
    /// out of range, followed by `days` of constant conditions.
    pub fn write_run(&self, name: &str, spec: RunSpec) -> PathBuf {
        let cols = ColumnConfig::default();
        let mut text = [
            cols.timestamp.as_str(),
            cols.outdoor_temperature.as_str(),
            cols.indoor_temperature.as_str(),
            cols.heating_energy.as_str(),
            cols.cooling_energy.as_str(),
            cols.facility_energy.as_str(),
            cols.heating_setpoint.as_str(),
            cols.cooling_setpoint.as_str(),
        ]
        .join(",");
        text.push('\n');
        for _ in 0..CALIBRATION_ROWS {
            text.push_str(" 06/28  23:55:00,-40.0,99.0,1e12,1e12,1e12,0.0,0.0\n");
        }
        for step in 0..self.steps() {
            let minutes = step * 5;
            let _ = writeln!(
                text,
                " {:02}/{:02}  {:02}:{:02}:00,{},{},{},{},{},20.0,25.0",
                7,
                1 + minutes / 1440,
                (minutes / 60) % 24,
                minutes % 60,
                spec.outdoor_c,
                spec.indoor_c,
                spec.heating_j,
                spec.cooling_j,
                spec.facility_j,
            );
        }
        let path = self.path(name);
        fs::write(&path, text).expect("write run table");
        path
    }

    /// Writes `count` copies of `value` as a headerless single-column file.
    pub fn write_column(&self, name: &str, value: f64, count: usize) -> PathBuf {
        let text: String = (0..count).map(|_| format!("{value}\n")).collect();
        let path = self.path(name);
        fs::write(&path, text).expect("write value file");
        path
    }

    /// Writes a binary occupancy file with a header row.
    pub fn write_occupancy(&self, occupied: bool) -> PathBuf {
        let mut text = String::from("occupancy\n");
        for _ in 0..self.steps() {
            text.push_str(if occupied { "1\n" } else { "0\n" });
        }
        let path = self.path("occupancy_5min.csv");
        fs::write(&path, text).expect("write occupancy");
        path
    }

    /// Writes an hourly probability file with a date/time index column.
    pub fn write_probability(&self, probability: f64) -> PathBuf {
        let mut text = String::from("Date/Time,probability\n");
        for hour in 0..self.days * 24 {
            let _ = writeln!(text, "2020-07-01 {:02}:00,{probability}", hour % 24);
        }
        let path = self.path("occupancy_probability.csv");
        fs::write(&path, text).expect("write probability");
        path
    }

    /// Real-time market prices at five-minute resolution, all `market_price`.
    pub fn write_real_time_prices(&self, market_price: f64) -> PathBuf {
        self.write_column("WholesaleRealTime_test.csv", market_price, self.steps())
    }

    /// Copies the two-sheet wholesale workbook from `tests/data`: sheet
    /// `test` holds 25 $/MWh and sheet `Aug3thru9` holds 50 $/MWh, one day each.
    pub fn write_legacy_workbook(&self) -> PathBuf {
        let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/WholesalePrice.xlsx");
        let path = self.path("WholesalePrice.xlsx");
        fs::copy(src, &path).expect("copy workbook");
        path
    }

    /// Configuration pointing at this fixture's files, with real-time prices.
    pub fn config(&self, runs: &[&Path], occupancy: &Path) -> AnalysisConfig {
        let mut cfg = AnalysisConfig::default();
        cfg.input.files = runs.iter().map(|p| p.to_path_buf()).collect();
        cfg.input.calibration_rows = CALIBRATION_ROWS;
        cfg.window.first_day = 0;
        cfg.window.last_day = self.days;
        cfg.price.mode = PriceMode::RealTime;
        cfg.price.date_range = "test".to_string();
        cfg.price.dir = self.dir.path().to_path_buf();
        cfg.occupancy.binary = occupancy.to_path_buf();
        cfg.output.summary = self.path("summary.csv").display().to_string();
        cfg.output.detail_suffix = "none".to_string();
        cfg
    }
}
