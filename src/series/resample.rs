use thiserror::Error;

/// Failure converting a series between grids.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResampleError {
    #[error(
        "cannot resample {from_minutes}-minute data onto a {to_minutes}-minute grid: \
         ratio is not a positive integer"
    )]
    NonIntegerRatio {
        from_minutes: usize,
        to_minutes: usize,
    },
}

/// Upsamples a coarse series by nearest-value repetition.
///
/// Each sample is repeated `from_minutes / to_minutes` times.
///
/// # Errors
///
/// Returns [`ResampleError::NonIntegerRatio`] unless `from_minutes` is a
/// positive integer multiple of `to_minutes`.
///
/// # Examples
///
/// ```
/// use comfort_cost::series::upsample_nearest;
///
/// let fine = upsample_nearest(&[1.0, 2.0], 15, 5).unwrap();
/// assert_eq!(fine, vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
/// ```
pub fn upsample_nearest(
    values: &[f64],
    from_minutes: usize,
    to_minutes: usize,
) -> Result<Vec<f64>, ResampleError> {
    if from_minutes == 0 || to_minutes == 0 || from_minutes % to_minutes != 0 {
        return Err(ResampleError::NonIntegerRatio {
            from_minutes,
            to_minutes,
        });
    }
    let ratio = from_minutes / to_minutes;
    Ok(values
        .iter()
        .flat_map(|&v| std::iter::repeat_n(v, ratio))
        .collect())
}

/// Linearly interpolates between consecutive samples, `factor` outputs per input.
///
/// The last sample has no successor and is held for its whole interval, so
/// the result always has `values.len() * factor` samples.
pub fn interpolate_linear(values: &[f64], factor: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() * factor);
    for (i, &v) in values.iter().enumerate() {
        let next = values.get(i + 1).copied().unwrap_or(v);
        for j in 0..factor {
            out.push(v + (next - v) * j as f64 / factor as f64);
        }
    }
    out
}
