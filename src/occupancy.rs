//! Binary and probabilistic occupancy sources, loaded once per batch.

use std::ops::Range;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::{OccupancyConfig, WindowConfig};
use crate::series::{ValueFileError, interpolate_linear, read_values};

#[derive(Debug, Error)]
pub enum OccupancyError {
    #[error("occupancy source: {0}")]
    Read(#[from] ValueFileError),
    #[error("occupancy value {value} at timestep {step} is not 0 or 1")]
    NotBinary { step: usize, value: f64 },
    #[error("occupancy probability {value} at hour {hour} is outside [0, 1]")]
    ProbabilityOutOfRange { hour: usize, value: f64 },
    #[error("{series} covers {available} timesteps, window ends at timestep {needed}")]
    ShortSource {
        series: &'static str,
        needed: usize,
        available: usize,
    },
}

/// Occupancy on the timestep grid, index 0 being the first timestep after
/// the calibration rows.
#[derive(Debug, Clone, Default)]
pub struct OccupancySchedule {
    occupied: Vec<bool>,
    probability: Option<Vec<f64>>,
}

/// Borrowed occupancy for one run window.
#[derive(Debug, Clone, Copy)]
pub struct OccupancyWindow<'a> {
    pub occupied: &'a [bool],
    pub probability: Option<&'a [f64]>,
}

impl OccupancySchedule {
    /// Reads the binary schedule and, when configured, the hourly
    /// probability file interpolated to `window.timestep_minutes`.
    ///
    /// # Errors
    ///
    /// Returns an `OccupancyError` if a file cannot be read or holds values
    /// outside the allowed range.
    pub fn load(cfg: &OccupancyConfig, window: &WindowConfig) -> Result<Self, OccupancyError> {
        let flags = read_values(&cfg.binary, 0)?;
        let probability = match &cfg.probability {
            Some(path) => Some(read_probability(path)?),
            None => None,
        };
        let schedule = Self::from_values(&flags, probability, window.steps_per_hour())?;
        info!(
            binary = %cfg.binary.display(),
            steps = schedule.len(),
            occupied = schedule.occupied.iter().filter(|&&o| o).count(),
            probability = schedule.has_probability(),
            "occupancy loaded"
        );
        Ok(schedule)
    }

    /// Builds a schedule from raw 0/1 values and optional hourly probabilities.
    ///
    /// # Errors
    ///
    /// Returns [`OccupancyError::NotBinary`] or
    /// [`OccupancyError::ProbabilityOutOfRange`] on invalid samples.
    pub fn from_values(
        flags: &[f64],
        hourly_probability: Option<Vec<f64>>,
        steps_per_hour: usize,
    ) -> Result<Self, OccupancyError> {
        let occupied = flags
            .iter()
            .enumerate()
            .map(|(step, &value)| match value {
                v if v == 0.0 => Ok(false),
                v if v == 1.0 => Ok(true),
                value => Err(OccupancyError::NotBinary { step, value }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let probability = match hourly_probability {
            Some(hourly) => {
                if let Some((hour, &value)) = hourly
                    .iter()
                    .enumerate()
                    .find(|(_, p)| !(0.0..=1.0).contains(*p))
                {
                    return Err(OccupancyError::ProbabilityOutOfRange { hour, value });
                }
                Some(interpolate_linear(&hourly, steps_per_hour))
            }
            None => None,
        };

        Ok(Self {
            occupied,
            probability,
        })
    }

    /// Occupancy for the timesteps in `range`.
    ///
    /// # Errors
    ///
    /// Returns [`OccupancyError::ShortSource`] if either source ends before
    /// the window does.
    pub fn window(&self, range: Range<usize>) -> Result<OccupancyWindow<'_>, OccupancyError> {
        let occupied = self
            .occupied
            .get(range.clone())
            .ok_or(OccupancyError::ShortSource {
                series: "occupancy",
                needed: range.end,
                available: self.occupied.len(),
            })?;
        let probability = match &self.probability {
            Some(p) => Some(p.get(range.clone()).ok_or(OccupancyError::ShortSource {
                series: "occupancy probability",
                needed: range.end,
                available: p.len(),
            })?),
            None => None,
        };
        Ok(OccupancyWindow {
            occupied,
            probability,
        })
    }

    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    pub fn has_probability(&self) -> bool {
        self.probability.is_some()
    }
}

// Probability files carry a date/time index in the first column; a bare
// single-column file is accepted too.
fn read_probability(path: &Path) -> Result<Vec<f64>, ValueFileError> {
    match read_values(path, 1) {
        Err(ValueFileError::MissingColumn { line: 1, .. }) => read_values(path, 0),
        other => other,
    }
}
