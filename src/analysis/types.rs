//! Per-timestep records and the run metrics derived from them.

use std::fmt;

use crate::comfort::{occupied_percent, percent_of_time};
use crate::price::CostBreakdown;

/// Complete record of one analysed timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Timestep index on the re-indexed table (after calibration rows).
    pub timestep: usize,
    /// Hours since the window start.
    pub time_hr: f64,
    pub timestamp: String,
    pub indoor_c: f64,
    pub outdoor_c: f64,
    pub occupied: bool,
    /// Interpolated occupancy probability, when a probability source is loaded.
    pub occupancy_probability: Option<f64>,
    pub full_lower_c: f64,
    pub full_upper_c: f64,
    pub ninety_lower_c: f64,
    pub ninety_upper_c: f64,
    pub eighty_lower_c: f64,
    pub eighty_upper_c: f64,
    pub weighted_lower_c: Option<f64>,
    pub weighted_upper_c: Option<f64>,
    pub in_full: bool,
    pub in_ninety: bool,
    pub in_eighty: bool,
    pub in_weighted: Option<bool>,
    /// `in_ninety AND occupied`.
    pub occupied_in_ninety: bool,
    /// `in_eighty AND occupied`.
    pub occupied_in_eighty: bool,
    /// Distance outside the 100% band (°C, zero inside).
    pub deviation_c: f64,
    /// Percent of occupants expected to be comfortable.
    pub percent_comfortable: f64,
    pub heating_setpoint_c: Option<f64>,
    pub cooling_setpoint_c: Option<f64>,
    pub heating_kwh: f64,
    pub cooling_kwh: f64,
    pub facility_kwh: f64,
    /// Retail price for this timestep ($/kWh).
    pub price_per_kwh: f64,
    /// Facility electricity cost for this timestep ($).
    pub cost: f64,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>5} ({:>6.2}h) | in={:>5.2} out={:>5.2} occ={} | \
             100%=[{:.2}, {:.2}] 90%=[{:.2}, {:.2}] 80%=[{:.2}, {:.2}] | \
             dev={:.2} comf={:.1}% | {:.4} kWh @ {:.4} $/kWh",
            self.timestep,
            self.time_hr,
            self.indoor_c,
            self.outdoor_c,
            u8::from(self.occupied),
            self.full_lower_c,
            self.full_upper_c,
            self.ninety_lower_c,
            self.ninety_upper_c,
            self.eighty_lower_c,
            self.eighty_upper_c,
            self.deviation_c,
            self.percent_comfortable,
            self.facility_kwh,
            self.price_per_kwh,
        )
    }
}

/// Scalar summary of one run.
///
/// Computed post hoc from the run's [`StepRecord`]s so the detail export and
/// the summary can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics {
    /// Facility electricity cost over the window ($).
    pub total_cost: f64,
    pub average_daily_cost: f64,
    pub heating_cost: f64,
    pub cooling_cost: f64,
    pub total_heating_kwh: f64,
    pub total_cooling_kwh: f64,
    pub average_daily_heating_kwh: f64,
    pub average_daily_cooling_kwh: f64,
    /// Mean distance outside the 100% band (°C).
    pub mean_deviation_c: f64,
    pub mean_percent_comfortable: f64,
    /// `None` when no timestep in the window is occupied.
    pub pct_occupied_in_ninety: Option<f64>,
    /// `None` when no timestep in the window is occupied.
    pub pct_occupied_in_eighty: Option<f64>,
    /// Percent of window time inside the occupancy-weighted band; `None`
    /// without a probability source.
    pub pct_time_in_weighted: Option<f64>,
}

impl RunMetrics {
    /// Derives all metrics from the complete record vector.
    ///
    /// # Arguments
    ///
    /// * `records` - One record per window timestep
    /// * `cost` - Window cost integrated from the aligned price and energy series
    /// * `days` - Number of days in the window
    pub fn from_records(records: &[StepRecord], cost: CostBreakdown, days: usize) -> Self {
        let n = records.len() as f64;
        let days_f = days as f64;

        let mut heating_kwh = 0.0;
        let mut cooling_kwh = 0.0;
        let mut deviation_sum = 0.0;
        let mut comfortable_sum = 0.0;
        for r in records {
            heating_kwh += r.heating_kwh;
            cooling_kwh += r.cooling_kwh;
            deviation_sum += r.deviation_c;
            comfortable_sum += r.percent_comfortable;
        }

        let occupied: Vec<bool> = records.iter().map(|r| r.occupied).collect();
        let in_ninety: Vec<bool> = records.iter().map(|r| r.in_ninety).collect();
        let in_eighty: Vec<bool> = records.iter().map(|r| r.in_eighty).collect();
        let in_weighted: Option<Vec<bool>> = records.iter().map(|r| r.in_weighted).collect();

        Self {
            total_cost: cost.total,
            average_daily_cost: cost.average_daily(days),
            heating_cost: cost.heating,
            cooling_cost: cost.cooling,
            total_heating_kwh: heating_kwh,
            total_cooling_kwh: cooling_kwh,
            average_daily_heating_kwh: heating_kwh / days_f,
            average_daily_cooling_kwh: cooling_kwh / days_f,
            mean_deviation_c: deviation_sum / n,
            mean_percent_comfortable: comfortable_sum / n,
            pct_occupied_in_ninety: occupied_percent(&in_ninety, &occupied).ok(),
            pct_occupied_in_eighty: occupied_percent(&in_eighty, &occupied).ok(),
            pct_time_in_weighted: in_weighted.as_deref().and_then(percent_of_time),
        }
    }

    /// Labelled summary rows in report order. The occupancy-weighted row is
    /// only included when `with_weighted` is set.
    pub fn rows(&self, with_weighted: bool) -> Vec<(&'static str, Option<f64>)> {
        let mut rows = vec![
            (labels::TOTAL_COST, Some(self.total_cost)),
            (labels::AVERAGE_DAILY_COST, Some(self.average_daily_cost)),
            (labels::HEATING_COST, Some(self.heating_cost)),
            (labels::COOLING_COST, Some(self.cooling_cost)),
            (labels::TOTAL_HEATING_KWH, Some(self.total_heating_kwh)),
            (labels::TOTAL_COOLING_KWH, Some(self.total_cooling_kwh)),
            (labels::DAILY_HEATING_KWH, Some(self.average_daily_heating_kwh)),
            (labels::DAILY_COOLING_KWH, Some(self.average_daily_cooling_kwh)),
            (labels::MEAN_DEVIATION, Some(self.mean_deviation_c)),
            (labels::MEAN_COMFORTABLE, Some(self.mean_percent_comfortable)),
            (labels::OCCUPIED_NINETY, self.pct_occupied_in_ninety),
            (labels::OCCUPIED_EIGHTY, self.pct_occupied_in_eighty),
        ];
        if with_weighted {
            rows.push((labels::TIME_WEIGHTED, self.pct_time_in_weighted));
        }
        rows
    }
}

/// Row labels of the summary table.
pub mod labels {
    pub const TOTAL_COST: &str = "Total Electricity Cost [$]";
    pub const AVERAGE_DAILY_COST: &str = "Average Daily Electricity Cost [$]";
    pub const HEATING_COST: &str = "Heating Electricity Cost [$]";
    pub const COOLING_COST: &str = "Cooling Electricity Cost [$]";
    pub const TOTAL_HEATING_KWH: &str = "Total Heating Electricity [kWh]";
    pub const TOTAL_COOLING_KWH: &str = "Total Cooling Electricity [kWh]";
    pub const DAILY_HEATING_KWH: &str = "Average Daily Heating Electricity [kWh]";
    pub const DAILY_COOLING_KWH: &str = "Average Daily Cooling Electricity [kWh]";
    pub const MEAN_DEVIATION: &str = "Mean Temp Diff from 100% Comfortable [°C]";
    pub const MEAN_COMFORTABLE: &str = "Mean Comfort Band Percent [%]";
    pub const OCCUPIED_NINETY: &str = "Percent of occupied time within 90% comfort band [%]";
    pub const OCCUPIED_EIGHTY: &str = "Percent of occupied time within 80% comfort band [%]";
    pub const TIME_WEIGHTED: &str = "Percent of time within occupancy-weighted comfort band [%]";
}

fn percent_or_undefined(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined (never occupied)".to_string(), |v| format!("{v:.1}%"))
}

impl fmt::Display for RunMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Total cost:            ${:.2} (${:.2}/day)",
            self.total_cost, self.average_daily_cost
        )?;
        writeln!(
            f,
            "Heating / cooling:     ${:.2} / ${:.2}",
            self.heating_cost, self.cooling_cost
        )?;
        writeln!(
            f,
            "Heating energy:        {:.2} kWh ({:.2} kWh/day)",
            self.total_heating_kwh, self.average_daily_heating_kwh
        )?;
        writeln!(
            f,
            "Cooling energy:        {:.2} kWh ({:.2} kWh/day)",
            self.total_cooling_kwh, self.average_daily_cooling_kwh
        )?;
        writeln!(f, "Mean deviation (100%): {:.3} °C", self.mean_deviation_c)?;
        writeln!(f, "Mean comfortable:      {:.1}%", self.mean_percent_comfortable)?;
        writeln!(
            f,
            "Occupied in 90% band:  {}",
            percent_or_undefined(self.pct_occupied_in_ninety)
        )?;
        write!(
            f,
            "Occupied in 80% band:  {}",
            percent_or_undefined(self.pct_occupied_in_eighty)
        )?;
        if let Some(pct) = self.pct_time_in_weighted {
            write!(f, "\nIn weighted band:      {pct:.1}%")?;
        }
        Ok(())
    }
}
