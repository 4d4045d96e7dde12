//! Per-run pipeline: price window, comfort bands, classification, records.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::types::{RunMetrics, StepRecord};
use crate::comfort::{AdaptiveComfortModel, BandKind, ComfortError, classify, occupied_in_band};
use crate::occupancy::{OccupancyError, OccupancySchedule};
use crate::price::{CostBreakdown, CostError, PriceSeries, joules_to_kwh};
use crate::series::{LoadError, RunDataset};

/// Number of leading records echoed at debug level.
const DEBUG_PREVIEW_ROWS: usize = 24;

/// Failure that invalidates one run; the batch skips it and continues.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Cost(#[from] CostError),
    #[error(transparent)]
    Comfort(#[from] ComfortError),
    #[error(transparent)]
    Occupancy(#[from] OccupancyError),
    #[error("cannot write detail export \"{path}\": {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Records and metrics of one analysed run.
#[derive(Debug, Clone)]
pub struct RunAnalysis {
    pub label: String,
    pub source: PathBuf,
    pub records: Vec<StepRecord>,
    pub metrics: RunMetrics,
}

/// Analyses runs against the batch-wide comfort model, prices and occupancy.
///
/// Holds only read-only state, so one analyzer serves every run of a batch.
#[derive(Debug, Clone)]
pub struct RunAnalyzer {
    model: AdaptiveComfortModel,
    prices: PriceSeries,
    occupancy: OccupancySchedule,
    days: usize,
}

impl RunAnalyzer {
    pub fn new(
        model: AdaptiveComfortModel,
        prices: PriceSeries,
        occupancy: OccupancySchedule,
        days: usize,
    ) -> Self {
        Self {
            model,
            prices,
            occupancy,
            days,
        }
    }

    /// Runs the full per-run pipeline on an already windowed dataset.
    ///
    /// # Errors
    ///
    /// Returns a `RunError` if the shared price or occupancy sources do not
    /// cover the run window, or any series is misaligned with the run.
    pub fn analyze(&self, ds: &RunDataset) -> Result<RunAnalysis, RunError> {
        let range = ds.step_range();
        let prices = self.prices.window(range.clone())?;
        let occupancy = self.occupancy.window(range)?;

        let cost = CostBreakdown::compute(
            prices,
            &ds.facility_energy_j,
            &ds.heating_energy_j,
            &ds.cooling_energy_j,
        )?;

        let full = self.model.band(BandKind::Full, &ds.outdoor_c);
        let ninety = self.model.band(BandKind::Ninety, &ds.outdoor_c);
        let eighty = self.model.band(BandKind::Eighty, &ds.outdoor_c);
        let weighted = occupancy
            .probability
            .map(|p| {
                self.model
                    .occupancy_weighted_band(&ds.outdoor_c, p, occupancy.occupied)
            })
            .transpose()?;

        let in_full = classify(&ds.indoor_c, &full)?;
        let in_ninety = classify(&ds.indoor_c, &ninety)?;
        let in_eighty = classify(&ds.indoor_c, &eighty)?;
        let in_weighted = weighted
            .as_ref()
            .map(|band| classify(&ds.indoor_c, band))
            .transpose()?;
        let occ_ninety = occupied_in_band(&in_ninety, occupancy.occupied)?;
        let occ_eighty = occupied_in_band(&in_eighty, occupancy.occupied)?;

        let records: Vec<StepRecord> = (0..ds.len())
            .map(|i| {
                let deviation_c =
                    AdaptiveComfortModel::deviation(full.lower[i], full.upper[i], ds.indoor_c[i]);
                let facility_kwh = joules_to_kwh(ds.facility_energy_j[i]);
                StepRecord {
                    timestep: ds.window_start + i,
                    time_hr: ds.time_hr[i],
                    timestamp: ds.timestamps[i].clone(),
                    indoor_c: ds.indoor_c[i],
                    outdoor_c: ds.outdoor_c[i],
                    occupied: occupancy.occupied[i],
                    occupancy_probability: occupancy.probability.map(|p| p[i]),
                    full_lower_c: full.lower[i],
                    full_upper_c: full.upper[i],
                    ninety_lower_c: ninety.lower[i],
                    ninety_upper_c: ninety.upper[i],
                    eighty_lower_c: eighty.lower[i],
                    eighty_upper_c: eighty.upper[i],
                    weighted_lower_c: weighted.as_ref().map(|b| b.lower[i]),
                    weighted_upper_c: weighted.as_ref().map(|b| b.upper[i]),
                    in_full: in_full[i],
                    in_ninety: in_ninety[i],
                    in_eighty: in_eighty[i],
                    in_weighted: in_weighted.as_ref().map(|f| f[i]),
                    occupied_in_ninety: occ_ninety[i],
                    occupied_in_eighty: occ_eighty[i],
                    deviation_c,
                    percent_comfortable: self.model.percent_comfortable(deviation_c),
                    heating_setpoint_c: ds.heating_setpoint_c.as_ref().map(|s| s[i]),
                    cooling_setpoint_c: ds.cooling_setpoint_c.as_ref().map(|s| s[i]),
                    heating_kwh: joules_to_kwh(ds.heating_energy_j[i]),
                    cooling_kwh: joules_to_kwh(ds.cooling_energy_j[i]),
                    facility_kwh,
                    price_per_kwh: prices[i],
                    cost: prices[i] * facility_kwh,
                }
            })
            .collect();

        for r in records.iter().take(DEBUG_PREVIEW_ROWS) {
            debug!(run = %ds.label, "{r}");
        }

        let metrics = RunMetrics::from_records(&records, cost, self.days);
        log_metrics(&ds.label, &metrics);

        Ok(RunAnalysis {
            label: ds.label.clone(),
            source: ds.source.clone(),
            records,
            metrics,
        })
    }
}

fn log_metrics(label: &str, m: &RunMetrics) {
    info!(
        run = %label,
        total_cost = m.total_cost,
        heating_kwh = m.total_heating_kwh,
        cooling_kwh = m.total_cooling_kwh,
        mean_deviation_c = m.mean_deviation_c,
        mean_comfortable_pct = m.mean_percent_comfortable,
        "run analysed"
    );
    if m.pct_occupied_in_ninety.is_none() || m.pct_occupied_in_eighty.is_none() {
        warn!(
            run = %label,
            "no occupied timesteps in window; occupied-comfort percentages are undefined"
        );
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::config::ComfortConfig;
    use crate::price::JOULES_TO_KWH;

    /// Hourly run of `n` steps at constant conditions.
    fn dataset(n: usize, outdoor: f64, indoor: f64) -> RunDataset {
        RunDataset {
            label: "run.csv".into(),
            source: PathBuf::from("run.csv"),
            window_start: 0,
            timestamps: (0..n).map(|i| format!("t{i}")).collect(),
            outdoor_c: vec![outdoor; n],
            indoor_c: vec![indoor; n],
            heating_energy_j: vec![1.0e6; n],
            cooling_energy_j: vec![0.0; n],
            facility_energy_j: vec![2.0e6; n],
            heating_setpoint_c: None,
            cooling_setpoint_c: Some(vec![25.0; n]),
            time_hr: (0..n).map(|i| i as f64).collect(),
        }
    }

    fn analyzer(n: usize, occupied: f64, probability: Option<Vec<f64>>) -> RunAnalyzer {
        RunAnalyzer::new(
            AdaptiveComfortModel::new(&ComfortConfig::default()),
            PriceSeries::from_per_kwh(vec![0.25; n]),
            OccupancySchedule::from_values(&vec![occupied; n], probability, 1)
                .expect("valid occupancy"),
            1,
        )
    }

    #[test]
    fn heating_deficient_run() {
        let a = analyzer(24, 1.0, None).analyze(&dataset(24, 20.0, 21.0)).unwrap();
        let r = &a.records[0];
        assert_abs_diff_eq!(r.full_lower_c, 22.5, epsilon = 1e-12);
        assert!(!r.in_full);
        assert_abs_diff_eq!(r.deviation_c, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(r.percent_comfortable, 70.32, epsilon = 1e-2);
        assert_abs_diff_eq!(a.metrics.mean_percent_comfortable, 70.32, epsilon = 1e-2);
        assert_eq!(a.metrics.pct_occupied_in_ninety, Some(0.0));
        assert_eq!(a.metrics.cooling_cost, 0.0);
        assert_abs_diff_eq!(
            a.metrics.total_cost,
            24.0 * 0.25 * 2.0e6 * JOULES_TO_KWH,
            epsilon = 1e-9
        );
        assert_eq!(r.cooling_setpoint_c, Some(25.0));
        assert_eq!(r.heating_setpoint_c, None);
    }

    #[test]
    fn comfortable_run_scores_full_marks() {
        let a = analyzer(24, 1.0, None).analyze(&dataset(24, 20.0, 24.0)).unwrap();
        assert_eq!(a.metrics.mean_deviation_c, 0.0);
        assert_eq!(a.metrics.mean_percent_comfortable, 100.0);
        assert_eq!(a.metrics.pct_occupied_in_ninety, Some(100.0));
        assert_eq!(a.metrics.pct_occupied_in_eighty, Some(100.0));
        assert_eq!(a.metrics.pct_time_in_weighted, None);
    }

    #[test]
    fn unoccupied_window_leaves_percentages_undefined() {
        let a = analyzer(24, 0.0, None).analyze(&dataset(24, 20.0, 24.0)).unwrap();
        assert_eq!(a.metrics.pct_occupied_in_ninety, None);
        assert_eq!(a.metrics.pct_occupied_in_eighty, None);
    }

    #[test]
    fn probability_enables_weighted_band() {
        let a = analyzer(24, 0.0, Some(vec![0.0; 24]))
            .analyze(&dataset(24, 20.0, 12.0))
            .unwrap();
        let r = &a.records[3];
        assert_eq!(r.occupancy_probability, Some(0.0));
        assert_eq!(r.weighted_lower_c, Some(f64::NEG_INFINITY));
        assert_eq!(r.in_weighted, Some(true));
        assert_eq!(a.metrics.pct_time_in_weighted, Some(100.0));
    }

    #[test]
    fn short_price_series_invalidates_run() {
        let mut a = analyzer(24, 1.0, None);
        a.prices = PriceSeries::from_per_kwh(vec![0.25; 10]);
        let err = a.analyze(&dataset(24, 20.0, 21.0));
        assert!(matches!(
            err,
            Err(RunError::Cost(CostError::ShortSource { series: "price", .. }))
        ));
    }

    #[test]
    fn short_occupancy_invalidates_run() {
        let mut a = analyzer(24, 1.0, None);
        a.occupancy = OccupancySchedule::from_values(&[1.0; 5], None, 1).unwrap();
        let err = a.analyze(&dataset(24, 20.0, 21.0));
        assert!(matches!(err, Err(RunError::Occupancy(_))));
    }

    #[test]
    fn record_cost_sums_to_total() {
        let a = analyzer(48, 1.0, None).analyze(&dataset(48, 5.0, 19.0)).unwrap();
        let summed: f64 = a.records.iter().map(|r| r.cost).sum();
        assert_abs_diff_eq!(summed, a.metrics.total_cost, epsilon = 1e-12);
    }
}
