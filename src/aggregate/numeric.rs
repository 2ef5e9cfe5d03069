//! Descriptive statistics over a single numeric column.

use serde::Serialize;

/// Descriptive summary of one numeric column, computed over present
/// values only.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NumericSummary {
    /// Number of present (non-missing) values.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// 50th percentile (linear interpolation).
    pub median: f64,
    /// Sample standard deviation (n - 1); `None` below two values.
    pub std_dev: Option<f64>,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// 25th percentile (linear interpolation).
    pub q25: f64,
    /// 75th percentile (linear interpolation).
    pub q75: f64,
}

impl NumericSummary {
    /// Copy with every statistic rounded for display.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            count: self.count,
            mean: round_to(self.mean, decimals),
            median: round_to(self.median, decimals),
            std_dev: self.std_dev.map(|v| round_to(v, decimals)),
            min: round_to(self.min, decimals),
            max: round_to(self.max, decimals),
            q25: round_to(self.q25, decimals),
            q75: round_to(self.q75, decimals),
        }
    }
}

/// Summarize a column; `None` when no values are present.
pub fn summarize(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std_dev = if count > 1 {
        let sum_sq: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some((sum_sq / (count - 1) as f64).sqrt())
    } else {
        None
    };

    Some(NumericSummary {
        count,
        mean,
        median: percentile(&sorted, 0.5),
        std_dev,
        min: sorted[0],
        max: sorted[count - 1],
        q25: percentile(&sorted, 0.25),
        q75: percentile(&sorted, 0.75),
    })
}

/// Percentile by linear interpolation between closest ranks.
/// `sorted` must be ascending and non-empty; `q` in `[0, 1]`.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Round half away from zero at `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn percentile_interpolates_between_ranks() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&sorted, 0.25) - 1.75).abs() < EPS);
        assert!((percentile(&sorted, 0.5) - 2.5).abs() < EPS);
        assert!((percentile(&sorted, 0.75) - 3.25).abs() < EPS);
        assert!((percentile(&sorted, 0.0) - 1.0).abs() < EPS);
        assert!((percentile(&sorted, 1.0) - 4.0).abs() < EPS);
    }

    #[test]
    fn summarize_uses_sample_standard_deviation() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let summary = summarize(&values).expect("summary");
        assert_eq!(summary.count, 8);
        assert!((summary.mean - 5.0).abs() < EPS);
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((summary.std_dev.expect("std") - expected).abs() < EPS);
        assert!((summary.min - 2.0).abs() < EPS);
        assert!((summary.max - 9.0).abs() < EPS);
    }

    #[test]
    fn summarize_single_value_has_no_std_dev() {
        let summary = summarize(&[42.0]).expect("summary");
        assert_eq!(summary.count, 1);
        assert_eq!(summary.std_dev, None);
        assert!((summary.median - 42.0).abs() < EPS);
    }

    #[test]
    fn summarize_empty_is_missing() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn round_to_is_half_away_from_zero() {
        assert_eq!(round_to(16.666_666, 2), 16.67);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(0.1235, 3), 0.124);
    }
}
