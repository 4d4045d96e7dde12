//! Adaptive thermal-comfort and energy-cost analysis for building simulation runs.

/// Per-run pipeline, batch driver, and metric types.
pub mod analysis;
pub mod cli;
/// Adaptive comfort model and occupancy-weighted classification.
pub mod comfort;
pub mod config;
/// CSV export of per-step detail and batch summaries.
pub mod io;
pub mod occupancy;
/// Price sources and cost integration.
pub mod price;
/// Loading and aligning raw simulation tables.
pub mod series;
