//! Adaptive comfort bands derived from outdoor temperature.

use std::fmt;

use super::classify::ComfortError;
use super::normal;
use crate::config::{BandCoefficients, ComfortConfig};

/// Which acceptability band a [`ComfortBand`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandKind {
    /// 100% acceptability.
    Full,
    /// 90% acceptability, with its own calibrated coefficients.
    Ninety,
    /// The 100% band widened by the 80% comfort range.
    Eighty,
    /// The 100% band widened per timestep from occupancy probability.
    OccupancyWeighted,
}

impl fmt::Display for BandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Full => "100%",
            Self::Ninety => "90%",
            Self::Eighty => "80%",
            Self::OccupancyWeighted => "occupancy-weighted",
        };
        f.write_str(name)
    }
}

/// Per-timestep lower and upper comfortable indoor temperature (°C).
#[derive(Debug, Clone, PartialEq)]
pub struct ComfortBand {
    pub kind: BandKind,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl ComfortBand {
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }
}

/// Replaces `value` with the nearest end of `[min, max]` when outside it.
///
/// Never panics, unlike `f64::clamp`, so infinite ranges pass through.
pub fn clamp_bound(value: f64, [min, max]: [f64; 2]) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Adaptive comfort model: affine bands in outdoor temperature, clamped to
/// fixed limits, plus the normal-distribution comfort score.
#[derive(Debug, Clone)]
pub struct AdaptiveComfortModel {
    sigma: f64,
    slope: f64,
    full: BandCoefficients,
    ninety: BandCoefficients,
    eighty_half_width: f64,
    ninety_half_width: f64,
}

impl AdaptiveComfortModel {
    pub fn new(cfg: &ComfortConfig) -> Self {
        let comfort_range = |p: f64| normal::inverse_cdf(0.5 + (1.0 - p) / 2.0) * cfg.sigma;
        Self {
            sigma: cfg.sigma,
            slope: cfg.slope,
            full: cfg.full,
            ninety: cfg.ninety,
            eighty_half_width: comfort_range(cfg.eighty_confidence),
            ninety_half_width: comfort_range(cfg.ninety_confidence),
        }
    }

    /// Half-width added around the 100% band at confidence `p` in `[0, 1]`.
    ///
    /// Zero at `p = 1`, unbounded at `p = 0`.
    pub fn comfort_range(&self, confidence: f64) -> f64 {
        let p = confidence.clamp(0.0, 1.0);
        normal::inverse_cdf(0.5 + (1.0 - p) / 2.0) * self.sigma
    }

    pub fn eighty_half_width(&self) -> f64 {
        self.eighty_half_width
    }

    pub fn ninety_half_width(&self) -> f64 {
        self.ninety_half_width
    }

    /// Clamped `(lower, upper)` bounds of `kind` at one outdoor temperature.
    ///
    /// `OccupancyWeighted` here means every timestep is occupied, which
    /// widens the 100% band by the 90% half-width.
    pub fn bounds(&self, kind: BandKind, outdoor_c: f64) -> (f64, f64) {
        match kind {
            BandKind::Full => self.widened(&self.full, outdoor_c, 0.0),
            BandKind::Ninety => self.widened(&self.ninety, outdoor_c, 0.0),
            // No dedicated 80% clamps: the 100% limits shift by cr80.
            BandKind::Eighty => self.widened(&self.full, outdoor_c, self.eighty_half_width),
            BandKind::OccupancyWeighted => {
                self.widened(&self.full, outdoor_c, self.ninety_half_width)
            }
        }
    }

    /// 100% band widened by `half_width` on both sides; the clamp limits of
    /// the 100% band shift outward by the same amount.
    pub fn widened_bounds(&self, outdoor_c: f64, half_width: f64) -> (f64, f64) {
        self.widened(&self.full, outdoor_c, half_width)
    }

    fn widened(&self, c: &BandCoefficients, outdoor_c: f64, half_width: f64) -> (f64, f64) {
        let base = self.slope * outdoor_c;
        let [lo_min, lo_max] = c.lower_clamp;
        let [up_min, up_max] = c.upper_clamp;
        let lower = clamp_bound(
            base + c.lower_intercept - half_width,
            [lo_min - half_width, lo_max - half_width],
        );
        let upper = clamp_bound(
            base + c.upper_intercept + half_width,
            [up_min + half_width, up_max + half_width],
        );
        (lower, upper)
    }

    /// Band of `kind` over a whole outdoor temperature series.
    pub fn band(&self, kind: BandKind, outdoor_c: &[f64]) -> ComfortBand {
        let (lower, upper) = outdoor_c.iter().map(|&t| self.bounds(kind, t)).unzip();
        ComfortBand { kind, lower, upper }
    }

    /// Continuous band whose confidence follows occupancy probability.
    ///
    /// Unoccupied timesteps use the comfort range at `probability[t]`;
    /// occupied timesteps always use the 90% half-width. The two regimes
    /// are not continuous where occupancy flips.
    ///
    /// # Errors
    ///
    /// Returns [`ComfortError::LengthMismatch`] unless all three series have
    /// the same length.
    pub fn occupancy_weighted_band(
        &self,
        outdoor_c: &[f64],
        probability: &[f64],
        occupied: &[bool],
    ) -> Result<ComfortBand, ComfortError> {
        ComfortError::check_len("occupancy probability", outdoor_c.len(), probability.len())?;
        ComfortError::check_len("occupancy", outdoor_c.len(), occupied.len())?;

        let (lower, upper) = outdoor_c
            .iter()
            .zip(probability)
            .zip(occupied)
            .map(|((&t, &p), &occ)| {
                let half_width = if occ {
                    self.ninety_half_width
                } else {
                    self.comfort_range(p)
                };
                self.widened_bounds(t, half_width)
            })
            .unzip();
        Ok(ComfortBand {
            kind: BandKind::OccupancyWeighted,
            lower,
            upper,
        })
    }

    /// Distance of `indoor_c` outside `[lower, upper]`, zero inside.
    pub fn deviation(lower: f64, upper: f64, indoor_c: f64) -> f64 {
        (lower - indoor_c).max(indoor_c - upper).max(0.0)
    }

    /// Share of occupants expected to be comfortable at `deviation` °C
    /// outside the 100% band: `100 * (2 - 2 * cdf(deviation / sigma))`.
    pub fn percent_comfortable(&self, deviation: f64) -> f64 {
        if deviation <= 0.0 {
            return 100.0;
        }
        200.0 * normal::survival(deviation / self.sigma)
    }
}
