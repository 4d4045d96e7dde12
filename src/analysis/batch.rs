//! Batch driver: loads shared sources once, then analyses each run in order.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::engine::{RunAnalysis, RunAnalyzer, RunError};
use super::types::RunMetrics;
use crate::comfort::AdaptiveComfortModel;
use crate::config::{AnalysisConfig, InputConfig, WindowConfig};
use crate::io::export::{detail_path, export_csv};
use crate::occupancy::{OccupancyError, OccupancySchedule};
use crate::price::{PriceError, PriceSeries};
use crate::series::{LoadError, load_run};

/// Failure loading the batch-wide sources. Fatal: no run can be analysed.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error(transparent)]
    Price(#[from] PriceError),
    #[error(transparent)]
    Occupancy(#[from] OccupancyError),
}

/// Metrics of one successfully analysed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub label: String,
    pub metrics: RunMetrics,
}

/// A run that contributed no metrics, with the reason it was dropped.
#[derive(Debug, Clone)]
pub struct SkippedRun {
    pub path: PathBuf,
    pub reason: String,
}

/// Ordered results of a batch, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub runs: Vec<RunSummary>,
    pub skipped: Vec<SkippedRun>,
}

impl BatchReport {
    /// True when at least one run computed the occupancy-weighted metric.
    pub fn has_weighted(&self) -> bool {
        self.runs
            .iter()
            .any(|r| r.metrics.pct_time_in_weighted.is_some())
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Comfort & Cost Report ---")?;
        for run in &self.runs {
            writeln!(f, "\n[{}]", run.label)?;
            writeln!(f, "{}", run.metrics)?;
        }
        if !self.skipped.is_empty() {
            writeln!(f, "\nSkipped runs:")?;
            for s in &self.skipped {
                writeln!(f, "  {}: {}", s.path.display(), s.reason)?;
            }
        }
        write!(
            f,
            "\n{} run(s) analysed, {} skipped",
            self.runs.len(),
            self.skipped.len()
        )
    }
}

/// One configured batch, ready to run.
#[derive(Debug, Clone)]
pub struct Batch {
    input: InputConfig,
    window: WindowConfig,
    detail_suffix: Option<String>,
    analyzer: RunAnalyzer,
}

impl Batch {
    /// Loads the price and occupancy sources shared by every run.
    ///
    /// # Errors
    ///
    /// Returns a `PrepareError` if either source cannot be loaded.
    pub fn prepare(config: &AnalysisConfig) -> Result<Self, PrepareError> {
        let prices = PriceSeries::load(&config.price, config.window.timestep_minutes)?;
        let occupancy = OccupancySchedule::load(&config.occupancy, &config.window)?;
        Ok(Self::from_parts(config, prices, occupancy))
    }

    /// Builds a batch from already loaded sources.
    pub fn from_parts(
        config: &AnalysisConfig,
        prices: PriceSeries,
        occupancy: OccupancySchedule,
    ) -> Self {
        let analyzer = RunAnalyzer::new(
            AdaptiveComfortModel::new(&config.comfort),
            prices,
            occupancy,
            config.window.day_count(),
        );
        Self {
            input: config.input.clone(),
            window: config.window.clone(),
            detail_suffix: config.output.detail_suffix(),
            analyzer,
        }
    }

    /// Analyses every configured run in input order.
    ///
    /// Runs that are missing or fail are logged and listed as skipped; they
    /// never abort the batch.
    pub fn run(&self) -> BatchReport {
        let mut report = BatchReport::default();
        for path in &self.input.files {
            match self.run_one(path) {
                Ok(analysis) => {
                    if let Err(e) = self.write_detail(&analysis) {
                        warn!(run = %analysis.label, error = %e, "detail export failed");
                    }
                    report.runs.push(RunSummary {
                        label: analysis.label,
                        metrics: analysis.metrics,
                    });
                }
                Err(RunError::Load(LoadError::NotFound(missing))) => {
                    warn!(path = %missing.display(), "input file does not exist, skipping");
                    report.skipped.push(SkippedRun {
                        path: missing,
                        reason: "file not found".to_string(),
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "run skipped");
                    report.skipped.push(SkippedRun {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        info!(
            analysed = report.runs.len(),
            skipped = report.skipped.len(),
            "batch complete"
        );
        report
    }

    /// Loads and analyses one run without writing anything.
    ///
    /// # Errors
    ///
    /// Returns a `RunError` if the run cannot be loaded or analysed.
    pub fn run_one(&self, path: &Path) -> Result<RunAnalysis, RunError> {
        let dataset = load_run(path, &self.input, &self.window)?;
        self.analyzer.analyze(&dataset)
    }

    /// Writes the per-timestep export next to the run's input, if enabled.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Export`] if the file cannot be written.
    pub fn write_detail(&self, analysis: &RunAnalysis) -> Result<Option<PathBuf>, RunError> {
        let Some(suffix) = &self.detail_suffix else {
            return Ok(None);
        };
        let path = detail_path(&analysis.source, suffix);
        export_csv(&analysis.records, &path).map_err(|source| RunError::Export {
            path: path.clone(),
            source,
        })?;
        info!(run = %analysis.label, path = %path.display(), "detail exported");
        Ok(Some(path))
    }
}
