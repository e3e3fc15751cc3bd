//! Descriptive statistics over numeric slices.
//!
//! Every function fails with [`TabulaError::Argument`] on empty input rather
//! than returning a placeholder value.

use crate::error::{Result, TabulaError};

/// Inputs at least this long use the lane-batched moment accumulation.
pub const BATCH_THRESHOLD: usize = 64;

/// Lane width of the batched path.
const LANES: usize = 8;

// =============================================================================
// STREAMING MOMENTS
// =============================================================================
// Welford's online algorithm for mean and variance in a single pass.

#[derive(Debug, Clone, Default)]
struct RunningMoments {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
}

impl RunningMoments {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    fn from_values(values: &[f64]) -> Self {
        let mut moments = Self::default();
        for &value in values {
            moments.add(value);
        }
        moments
    }

    /// Population variance.
    fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }
}

fn ensure_non_empty(values: &[f64], statistic: &str) -> Result<()> {
    if values.is_empty() {
        Err(TabulaError::Argument(format!(
            "{} of an empty sequence is undefined",
            statistic
        )))
    } else {
        Ok(())
    }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Median of an already sorted, non-empty slice.
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values, "mean")?;
    Ok(RunningMoments::from_values(values).mean)
}

/// Middle value, or the average of the two middle values for even counts.
pub fn median(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values, "median")?;
    Ok(median_of_sorted(&sorted(values)))
}

/// Percentile with linear interpolation between adjacent ranks.
///
/// `p = 0` gives the minimum and `p = 100` the maximum.
pub fn percentile(values: &[f64], p: f64) -> Result<f64> {
    ensure_non_empty(values, "percentile")?;
    if !(0.0..=100.0).contains(&p) {
        return Err(TabulaError::Argument(format!(
            "percentile {} outside [0, 100]",
            p
        )));
    }

    let sorted = sorted(values);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let fraction = rank - lo as f64;
    // clamp keeps rounding from overshooting the next rank
    Ok((sorted[lo] + (sorted[hi] - sorted[lo]) * fraction).min(sorted[hi]))
}

/// Tukey fences `(Q1 - 1.5·IQR, Q3 + 1.5·IQR)`.
///
/// Q1 and Q3 are the medians of the halves strictly below and above the
/// median position. A single value yields `(v, v)`.
pub fn iqr_range(values: &[f64]) -> Result<(f64, f64)> {
    ensure_non_empty(values, "interquartile range")?;
    let sorted = sorted(values);
    let n = sorted.len();
    if n == 1 {
        return Ok((sorted[0], sorted[0]));
    }

    let half = n / 2;
    let q1 = median_of_sorted(&sorted[..half]);
    let q3 = median_of_sorted(&sorted[n - half..]);
    let iqr = q3 - q1;
    Ok((q1 - 1.5 * iqr, q3 + 1.5 * iqr))
}

/// Median of absolute deviations from the median.
pub fn median_absolute_deviation(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values, "median absolute deviation")?;
    let center = median(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

/// Population variance.
pub fn variance(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values, "variance")?;
    Ok(RunningMoments::from_values(values).variance())
}

/// Population standard deviation.
pub fn standard_deviation(values: &[f64]) -> Result<f64> {
    Ok(variance(values)?.sqrt())
}

/// Population excess kurtosis, `m4 / m2² - 3`.
///
/// Fails when all values are equal, since the standardized deviations are
/// then undefined.
pub fn kurtosis(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values, "kurtosis")?;
    let center = mean(values)?;
    let (m2, m4) = if values.len() >= BATCH_THRESHOLD {
        central_moments_batched(values, center)
    } else {
        central_moments_scalar(values, center)
    };
    excess_kurtosis(m2, m4, values.len())
}

fn excess_kurtosis(sum_sq: f64, sum_quad: f64, n: usize) -> Result<f64> {
    let m2 = sum_sq / n as f64;
    let m4 = sum_quad / n as f64;
    if m2 == 0.0 {
        return Err(TabulaError::Argument(
            "kurtosis of a constant sequence is undefined".to_string(),
        ));
    }
    Ok(m4 / (m2 * m2) - 3.0)
}

/// Sums of squared and fourth-power deviations, one value at a time.
fn central_moments_scalar(values: &[f64], center: f64) -> (f64, f64) {
    values.iter().fold((0.0, 0.0), |(s2, s4), &v| {
        let d2 = (v - center) * (v - center);
        (s2 + d2, s4 + d2 * d2)
    })
}

/// Same sums as [`central_moments_scalar`], accumulated in independent
/// lanes so the compiler can vectorize the inner loop.
fn central_moments_batched(values: &[f64], center: f64) -> (f64, f64) {
    let mut acc2 = [0.0_f64; LANES];
    let mut acc4 = [0.0_f64; LANES];

    let chunks = values.chunks_exact(LANES);
    let remainder = chunks.remainder();
    for chunk in chunks {
        for lane in 0..LANES {
            let d = chunk[lane] - center;
            let d2 = d * d;
            acc2[lane] += d2;
            acc4[lane] += d2 * d2;
        }
    }

    let (tail2, tail4) = central_moments_scalar(remainder, center);
    (
        acc2.iter().sum::<f64>() + tail2,
        acc4.iter().sum::<f64>() + tail4,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
        assert_eq!(median(&[5.0, 1.0, 3.0]).unwrap(), 3.0);
        assert!(median(&[]).is_err());
    }

    #[test]
    fn test_percentile_bounds_and_interpolation() {
        let values = [15.0, 20.0, 35.0, 40.0, 50.0];
        assert_eq!(percentile(&values, 0.0).unwrap(), 15.0);
        assert_eq!(percentile(&values, 100.0).unwrap(), 50.0);
        assert_eq!(percentile(&values, 50.0).unwrap(), 35.0);
        assert!(approx(percentile(&values, 40.0).unwrap(), 29.0));
        assert!(percentile(&values, 101.0).is_err());
        assert!(percentile(&values, -1.0).is_err());
        assert!(percentile(&values, f64::NAN).is_err());
        assert!(percentile(&[], 50.0).is_err());
    }

    #[test]
    fn test_iqr_range() {
        // halves [1,2,3] and [5,6,7]
        let (low, high) = iqr_range(&[7.0, 1.0, 3.0, 4.0, 2.0, 6.0, 5.0]).unwrap();
        assert_eq!((low, high), (-4.0, 12.0));
        assert_eq!(iqr_range(&[3.0]).unwrap(), (3.0, 3.0));
        assert!(iqr_range(&[]).is_err());
    }

    #[test]
    fn test_mad() {
        assert_eq!(
            median_absolute_deviation(&[1.0, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0]).unwrap(),
            1.0
        );
        assert!(matches!(median_absolute_deviation(&[]), Err(TabulaError::Argument(_))));
    }

    #[test]
    fn test_variance_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx(variance(&values).unwrap(), 4.0));
        assert!(approx(standard_deviation(&values).unwrap(), 2.0));
        assert_eq!(variance(&[3.0]).unwrap(), 0.0);
        assert!(variance(&[]).is_err());
    }

    #[test]
    fn test_kurtosis_known_values() {
        // two-point symmetric distribution: m4/m2^2 = 1
        assert!(approx(kurtosis(&[-1.0, 1.0, -1.0, 1.0]).unwrap(), -2.0));
        assert!(kurtosis(&[2.0, 2.0, 2.0]).is_err());
        assert!(kurtosis(&[]).is_err());
    }

    #[test]
    fn test_batched_path_matches_scalar() {
        let values: Vec<f64> = (0..1003)
            .map(|i| ((i * 37) % 101) as f64 * 0.5 + (i % 7) as f64)
            .collect();
        let center = mean(&values).unwrap();
        let (s2, s4) = central_moments_scalar(&values, center);
        let (b2, b4) = central_moments_batched(&values, center);
        assert!(approx(s2, b2));
        assert!(approx(s4, b4));
        let scalar = excess_kurtosis(s2, s4, values.len()).unwrap();
        assert!(approx(kurtosis(&values).unwrap(), scalar));
    }
}
