//! In-band classification and occupancy-weighted percentages.

use thiserror::Error;

use super::model::ComfortBand;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComfortError {
    #[error("{series} has {actual} samples, expected {expected}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("metric undefined: no occupied timesteps in the window")]
    UndefinedMetric,
}

impl ComfortError {
    pub(crate) fn check_len(
        series: &'static str,
        expected: usize,
        actual: usize,
    ) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::LengthMismatch {
                series,
                expected,
                actual,
            })
        }
    }
}

/// Strictly inside `(lower, upper)`; boundary values are out of band.
pub fn in_band(lower: f64, upper: f64, indoor_c: f64) -> bool {
    lower < indoor_c && indoor_c < upper
}

/// Per-timestep in-band flags for `indoor_c` against `band`.
///
/// # Errors
///
/// Returns [`ComfortError::LengthMismatch`] if the band and indoor series
/// differ in length.
pub fn classify(indoor_c: &[f64], band: &ComfortBand) -> Result<Vec<bool>, ComfortError> {
    ComfortError::check_len("comfort band", indoor_c.len(), band.len())?;
    Ok(indoor_c
        .iter()
        .zip(band.lower.iter().zip(&band.upper))
        .map(|(&t, (&lo, &hi))| in_band(lo, hi, t))
        .collect())
}

/// Occupied-and-comfortable flags: `in_band AND occupied`.
///
/// # Errors
///
/// Returns [`ComfortError::LengthMismatch`] on misaligned inputs.
pub fn occupied_in_band(in_band: &[bool], occupied: &[bool]) -> Result<Vec<bool>, ComfortError> {
    ComfortError::check_len("occupancy", in_band.len(), occupied.len())?;
    Ok(in_band.iter().zip(occupied).map(|(&c, &o)| c && o).collect())
}

/// `100 * sum(occupied_in_band) / sum(occupied)`.
///
/// # Errors
///
/// Returns [`ComfortError::UndefinedMetric`] when no timestep is occupied,
/// or [`ComfortError::LengthMismatch`] on misaligned inputs.
///
/// # Examples
///
/// ```
/// use comfort_cost::comfort::{occupied_percent, ComfortError};
///
/// let pct = occupied_percent(&[true, false, true, true], &[true, true, true, false]);
/// assert!((pct.unwrap() - 200.0 / 3.0).abs() < 1e-12);
/// assert_eq!(occupied_percent(&[true], &[false]), Err(ComfortError::UndefinedMetric));
/// ```
pub fn occupied_percent(in_band: &[bool], occupied: &[bool]) -> Result<f64, ComfortError> {
    let hits = occupied_in_band(in_band, occupied)?;
    let occupied_steps = occupied.iter().filter(|&&o| o).count();
    if occupied_steps == 0 {
        return Err(ComfortError::UndefinedMetric);
    }
    let comfortable = hits.iter().filter(|&&h| h).count();
    Ok(100.0 * comfortable as f64 / occupied_steps as f64)
}

/// Share of all timesteps flagged true, in percent. `None` for an empty window.
pub fn percent_of_time(flags: &[bool]) -> Option<f64> {
    if flags.is_empty() {
        return None;
    }
    let hits = flags.iter().filter(|&&f| f).count();
    Some(100.0 * hits as f64 / flags.len() as f64)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::comfort::BandKind;

    fn band(lower: Vec<f64>, upper: Vec<f64>) -> ComfortBand {
        ComfortBand {
            kind: BandKind::Full,
            lower,
            upper,
        }
    }

    #[test]
    fn boundaries_are_out_of_band() {
        assert!(!in_band(22.5, 25.5, 22.5));
        assert!(!in_band(22.5, 25.5, 25.5));
        assert!(in_band(22.5, 25.5, 22.500001));
        assert!(!in_band(22.5, 25.5, 21.0));
    }

    #[test]
    fn classification_matches_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = 500;
        let lower: Vec<f64> = (0..n).map(|_| rng.random_range(18.0..24.0)).collect();
        let upper: Vec<f64> = lower.iter().map(|l| l + rng.random_range(0.0..6.0)).collect();
        let indoor: Vec<f64> = (0..n).map(|_| rng.random_range(15.0..32.0)).collect();
        let b = band(lower.clone(), upper.clone());
        let flags = classify(&indoor, &b).unwrap();
        for i in 0..n {
            assert_eq!(flags[i], lower[i] < indoor[i] && indoor[i] < upper[i]);
        }
    }

    #[test]
    fn classify_rejects_misaligned_band() {
        let b = band(vec![20.0], vec![24.0]);
        assert_eq!(
            classify(&[21.0, 22.0], &b),
            Err(ComfortError::LengthMismatch {
                series: "comfort band",
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn zero_occupancy_is_undefined() {
        let flags = vec![true; 12];
        let empty = vec![false; 12];
        assert_eq!(occupied_percent(&flags, &empty), Err(ComfortError::UndefinedMetric));
    }

    #[test]
    fn occupied_percent_is_bounded() {
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..200 {
            let n = rng.random_range(1..300);
            let flags: Vec<bool> = (0..n).map(|_| rng.random_bool(0.6)).collect();
            let occ: Vec<bool> = (0..n).map(|_| rng.random_bool(0.3)).collect();
            match occupied_percent(&flags, &occ) {
                Ok(p) => assert!((0.0..=100.0).contains(&p)),
                Err(e) => {
                    assert_eq!(e, ComfortError::UndefinedMetric);
                    assert!(occ.iter().all(|o| !o));
                }
            }
        }
    }

    #[test]
    fn percent_of_time_counts_flags() {
        assert_eq!(percent_of_time(&[]), None);
        assert_eq!(percent_of_time(&[true, false, false, true]), Some(50.0));
    }
}
