//! Descriptive statistics over numeric answer columns.
//!
//! All functions coerce non-finite inputs to [`DEFAULT_FILL`] first and return
//! 0 for empty input, so a result is never NaN.

use serde::{Deserialize, Serialize};

use crate::interpretation::interpret_mean;
use crate::utils::{DEFAULT_FILL, coerce_all, safe_number};

/// Labels for the five Likert points.
pub const LIKERT_LABELS: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neither",
    "Agree",
    "Strongly Agree",
];

/// Summary of a single numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DescriptiveStats {
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

/// One point of a Likert distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikertBucket {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
    pub cumulative: f64,
}

/// Full summary of a 1-5 Likert item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikertSummary {
    pub n: usize,
    pub mean: f64,
    /// Standard error of the mean.
    pub sem: f64,
    pub ci95: (f64, f64),
    pub sd: f64,
    pub median: f64,
    pub mode: f64,
    pub skewness: f64,
    pub distribution: Vec<LikertBucket>,
    pub interpretation: String,
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|v| safe_number(Some(*v), DEFAULT_FILL)).sum();
    sum / values.len() as f64
}

/// Median; the average of the two middle values for even lengths.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent value. Ties go to the value seen first.
pub fn mode(values: &[f64]) -> f64 {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for v in coerce_all(values) {
        match counts.iter_mut().find(|(seen, _)| *seen == v) {
            Some((_, count)) => *count += 1,
            None => counts.push((v, 1)),
        }
    }

    let mut best: Option<(f64, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v).unwrap_or(0.0)
}

/// Population standard deviation (divides by N).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let values = coerce_all(values);
    let m = mean(&values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Population variance.
pub fn variance(values: &[f64]) -> f64 {
    std_dev(values).powi(2)
}

/// Percentile by linear interpolation between the bracketing sorted ranks.
///
/// `p` is clamped to `[0, 100]`.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(values);
    let p = safe_number(Some(p), 0.0).clamp(0.0, 100.0);
    let index = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    let weight = index - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Adjusted Fisher-Pearson skewness. 0 for fewer than 3 values or zero spread.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return 0.0;
    }
    let values = coerce_all(values);
    let m = mean(&values);
    let sd = std_dev(&values);
    if sd == 0.0 {
        return 0.0;
    }
    let n = n as f64;
    let sum: f64 = values.iter().map(|v| ((v - m) / sd).powi(3)).sum();
    (n / ((n - 1.0) * (n - 2.0))) * sum
}

/// Standard error of a proportion.
pub fn standard_error(p: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = safe_number(Some(p), 0.0);
    ((p * (1.0 - p)) / n as f64).max(0.0).sqrt()
}

/// Wald confidence interval for a proportion, clamped to `[0, 1]`.
pub fn confidence_interval(p: f64, n: usize, z: f64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }
    let p = safe_number(Some(p), 0.0);
    let se = standard_error(p, n);
    let lower = (p - z * se).clamp(0.0, 1.0);
    let upper = (p + z * se).clamp(0.0, 1.0);
    (lower.min(upper), upper)
}

/// `count / total * 100`, or 0 when `total` is 0.
pub fn percentage(count: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (count / total) * 100.0
}

/// Summarize a numeric column.
pub fn describe(values: &[f64]) -> DescriptiveStats {
    if values.is_empty() {
        return DescriptiveStats::default();
    }
    let values = coerce_all(values);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    DescriptiveStats {
        n: values.len(),
        mean: mean(&values),
        median: median(&values),
        mode: mode(&values),
        std_dev: std_dev(&values),
        skewness: skewness(&values),
        min,
        max,
        q1: percentile(&values, 25.0),
        q3: percentile(&values, 75.0),
    }
}

/// Summarize a 1-5 Likert item.
///
/// The interval uses the normal approximation `mean ± 1.96 * sem`.
pub fn likert_summary(values: &[f64]) -> LikertSummary {
    let values = coerce_all(values);
    let n = values.len();
    let m = mean(&values);
    let sd = std_dev(&values);
    let sem = if n == 0 { 0.0 } else { sd / (n as f64).sqrt() };

    let distribution = LIKERT_LABELS
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let point = (idx + 1) as f64;
            let count = values.iter().filter(|v| **v == point).count();
            let at_or_below = values.iter().filter(|v| **v <= point).count();
            LikertBucket {
                category: (*label).to_string(),
                count,
                percentage: percentage(count as f64, n as f64),
                cumulative: percentage(at_or_below as f64, n as f64),
            }
        })
        .collect();

    LikertSummary {
        n,
        mean: m,
        sem,
        ci95: (m - 1.96 * sem, m + 1.96 * sem),
        sd,
        median: median(&values),
        mode: mode(&values),
        skewness: skewness(&values),
        distribution,
        interpretation: interpret_mean(m).to_string(),
    }
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = coerce_all(values);
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==== empty input tests ====

    #[test]
    fn test_empty_inputs_return_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(mode(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(skewness(&[]), 0.0);
    }

    #[test]
    fn test_nan_is_coerced() {
        assert_eq!(mean(&[f64::NAN, 2.0]), 1.0);
        assert!(!std_dev(&[f64::NAN, f64::INFINITY]).is_nan());
    }

    // ==== central tendency tests ====

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        assert_eq!(mode(&[5.0, 2.0, 2.0, 5.0]), 5.0);
        assert_eq!(mode(&[1.0, 3.0, 3.0]), 3.0);
    }

    // ==== dispersion tests ====

    #[test]
    fn test_std_dev_constant_is_zero() {
        assert_eq!(std_dev(&[4.0, 4.0, 4.0]), 0.0);
    }

    #[test]
    fn test_std_dev_population() {
        // variance of [2,4,4,4,5,5,7,9] is 4
        let sd = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((sd - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&values, 0.0), 10.0);
        assert_eq!(percentile(&values, 100.0), 40.0);
        assert!((percentile(&values, 50.0) - 25.0).abs() < 1e-12);
        assert_eq!(percentile(&values, 150.0), 40.0);
    }

    #[test]
    fn test_skewness_symmetric_is_zero() {
        assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]).abs() < 1e-12);
        assert_eq!(skewness(&[1.0, 9.0]), 0.0);
        assert!(skewness(&[1.0, 1.0, 1.0, 10.0]) > 0.0);
    }

    // ==== proportion tests ====

    #[test]
    fn test_confidence_interval_bounds() {
        assert_eq!(confidence_interval(0.5, 0, 1.96), (0.0, 0.0));
        for p in [0.0, 0.01, 0.3, 0.5, 0.99, 1.0] {
            for n in [1, 5, 30, 1000] {
                let (lo, hi) = confidence_interval(p, n, 1.96);
                assert!(lo <= hi);
                assert!((0.0..=1.0).contains(&lo));
                assert!((0.0..=1.0).contains(&hi));
            }
        }
    }

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(percentage(3.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
    }

    // ==== summary tests ====

    #[test]
    fn test_describe() {
        let stats = describe(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stats.n, 5);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
    }

    #[test]
    fn test_likert_summary_distribution() {
        let summary = likert_summary(&[1.0, 2.0, 2.0, 4.0, 5.0]);
        assert_eq!(summary.n, 5);
        assert_eq!(summary.distribution.len(), 5);
        assert_eq!(summary.distribution[1].count, 2);
        assert_eq!(summary.distribution[1].percentage, 40.0);
        assert_eq!(summary.distribution[2].cumulative, 60.0);
        assert_eq!(summary.distribution[4].cumulative, 100.0);
        assert!(summary.ci95.0 < summary.mean && summary.mean < summary.ci95.1);
        assert_eq!(summary.interpretation, "Neutral (mixed)");
    }

    #[test]
    fn test_likert_summary_empty() {
        let summary = likert_summary(&[]);
        assert_eq!(summary.n, 0);
        assert_eq!(summary.sem, 0.0);
        assert!(summary.distribution.iter().all(|b| b.percentage == 0.0));
    }
}
