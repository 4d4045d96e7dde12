//! Per-run analysis pipeline and batch driver.

pub mod batch;
pub mod engine;
pub mod types;

pub use batch::{Batch, BatchReport, PrepareError, RunSummary, SkippedRun};
pub use engine::{RunAnalysis, RunAnalyzer, RunError};
pub use types::{RunMetrics, StepRecord, labels};
