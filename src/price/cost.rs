//! Energy cost integration over an analysis window.

use thiserror::Error;

/// Joules to kilowatt-hours, as used for all simulation energy columns.
pub const JOULES_TO_KWH: f64 = 2.77778e-7;

/// Price and energy series that cannot be integrated together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostError {
    #[error("{series} has {actual} samples, expected {expected} to match the energy series")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{series} covers {available} timesteps, window ends at timestep {needed}")]
    ShortSource {
        series: &'static str,
        needed: usize,
        available: usize,
    },
}

/// Converts simulation energy (J) to kWh.
pub fn joules_to_kwh(joules: f64) -> f64 {
    joules * JOULES_TO_KWH
}

/// Integrates `price[t] * energy[t]` over the window, energy in joules.
///
/// # Errors
///
/// Returns [`CostError::LengthMismatch`] when the series are not index-aligned.
///
/// # Examples
///
/// ```
/// use comfort_cost::price::{integrate_cost, JOULES_TO_KWH};
///
/// let cost = integrate_cost(&[0.2, 0.2], &[1.0e6, 2.0e6]).unwrap();
/// assert!((cost - 0.2 * 3.0e6 * JOULES_TO_KWH).abs() < 1e-12);
/// ```
pub fn integrate_cost(prices: &[f64], energy_j: &[f64]) -> Result<f64, CostError> {
    if prices.len() != energy_j.len() {
        return Err(CostError::LengthMismatch {
            series: "price",
            expected: energy_j.len(),
            actual: prices.len(),
        });
    }
    Ok(prices
        .iter()
        .zip(energy_j)
        .map(|(&p, &e)| p * joules_to_kwh(e))
        .sum())
}

/// Window cost split into facility total and heating/cooling subtotals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostBreakdown {
    /// Whole-facility electricity cost ($).
    pub total: f64,
    /// Heating electricity cost ($).
    pub heating: f64,
    /// Cooling electricity cost ($).
    pub cooling: f64,
}

impl CostBreakdown {
    /// Integrates all three energy series against one price window.
    ///
    /// # Errors
    ///
    /// Returns a `CostError` if any energy series is not aligned with `prices`.
    pub fn compute(
        prices: &[f64],
        facility_j: &[f64],
        heating_j: &[f64],
        cooling_j: &[f64],
    ) -> Result<Self, CostError> {
        Ok(Self {
            total: integrate_cost(prices, facility_j)?,
            heating: integrate_cost(prices, heating_j)?,
            cooling: integrate_cost(prices, cooling_j)?,
        })
    }

    /// Total cost divided by the number of days in the window.
    pub fn average_daily(&self, days: usize) -> f64 {
        self.total / days as f64
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn uniform_series_integrates_exactly() {
        let w = 2016;
        let (k, e) = (0.2345, 1.8e6);
        let cost = integrate_cost(&vec![k; w], &vec![e; w]).unwrap();
        assert_relative_eq!(cost, k * e * JOULES_TO_KWH * w as f64, max_relative = 1e-10);
    }

    #[test]
    fn cost_is_linear_in_price() {
        let prices: Vec<f64> = (0..288).map(|i| 0.05 + 0.001 * i as f64).collect();
        let energy: Vec<f64> = (0..288).map(|i| 1.0e5 * ((i % 7) as f64)).collect();
        let base = integrate_cost(&prices, &energy).unwrap();
        for k in [0.0, 0.5, 3.0, 12.5] {
            let scaled: Vec<f64> = prices.iter().map(|p| p * k).collect();
            let cost = integrate_cost(&scaled, &energy).unwrap();
            assert_relative_eq!(cost, k * base, max_relative = 1e-10);
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert_eq!(
            integrate_cost(&[1.0, 2.0], &[1.0]),
            Err(CostError::LengthMismatch {
                series: "price",
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn zero_heating_and_cooling_cost_nothing() {
        let prices = vec![0.3; 12];
        let zeros = vec![0.0; 12];
        let facility = vec![3.6e6; 12];
        let c = CostBreakdown::compute(&prices, &facility, &zeros, &zeros).unwrap();
        assert_eq!(c.heating, 0.0);
        assert_eq!(c.cooling, 0.0);
        assert_relative_eq!(c.total, 12.0 * 0.3 * 3.6e6 * JOULES_TO_KWH, max_relative = 1e-10);
    }

    #[test]
    fn average_daily_divides_by_days() {
        let c = CostBreakdown {
            total: 14.0,
            heating: 4.0,
            cooling: 6.0,
        };
        assert_eq!(c.average_daily(7), 2.0);
    }
}
