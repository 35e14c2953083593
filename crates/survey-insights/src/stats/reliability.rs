//! Scale reliability, rank correlation and agreement statistics.

use serde::{Deserialize, Serialize};

use super::descriptive::{mean, std_dev, variance};
use super::pvalue::{chi_square_p_value, t_p_value};
use crate::utils::{DEFAULT_FILL, coerce_all};

/// Spearman rank correlation with a bucketed p-value and a 95% interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpearmanResult {
    pub rho: f64,
    pub p_value: f64,
    pub ci95: (f64, f64),
}

impl Default for SpearmanResult {
    fn default() -> Self {
        Self {
            rho: 0.0,
            p_value: 1.0,
            ci95: (0.0, 0.0),
        }
    }
}

/// Kendall's coefficient of concordance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KendallWResult {
    pub w: f64,
    pub chi_square: f64,
    pub df: usize,
    pub p_value: f64,
}

/// One-sample t-test against a fixed reference value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    pub t: f64,
    pub df: usize,
    pub p_value: f64,
}

/// Cronbach's alpha for `items`, each a column of responses.
///
/// Uses population variances. Columns shorter than the first are padded with
/// the fill value. Returns 0 for fewer than two items or a constant total.
pub fn cronbach_alpha(items: &[Vec<f64>]) -> f64 {
    let k = items.len();
    if k < 2 {
        return 0.0;
    }

    let sum_item_variances: f64 = items.iter().map(|item| variance(item)).sum();
    let totals = total_scores(items);
    let total_variance = variance(&totals);
    if total_variance == 0.0 {
        return 0.0;
    }

    let k = k as f64;
    (k / (k - 1.0)) * (1.0 - sum_item_variances / total_variance)
}

/// Per-respondent sum across item columns.
pub fn total_scores(items: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = items.first() else {
        return Vec::new();
    };
    (0..first.len())
        .map(|i| {
            items
                .iter()
                .map(|item| item.get(i).copied().unwrap_or(DEFAULT_FILL))
                .map(|v| if v.is_finite() { v } else { DEFAULT_FILL })
                .sum()
        })
        .collect()
}

/// Pearson correlation between an item and the scale total.
pub fn item_total_correlation(item: &[f64], total: &[f64]) -> f64 {
    pearson(item, total)
}

/// Ascending sort-position ranks, 1-based.
///
/// Ties are not averaged: equal values receive consecutive ranks in input order.
pub fn ranks(values: &[f64]) -> Vec<f64> {
    let values = coerce_all(values);
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|a, b| values[*a].total_cmp(&values[*b]));

    let mut ranks = vec![0.0; values.len()];
    for (position, idx) in order.into_iter().enumerate() {
        ranks[idx] = (position + 1) as f64;
    }
    ranks
}

/// Spearman's rho as the Pearson correlation of [`ranks`].
///
/// Only the first `min(x.len(), y.len())` pairs are used; fewer than three
/// pairs yields `{rho: 0, p: 1, ci95: (0, 0)}`.
pub fn spearman_rho(x: &[f64], y: &[f64]) -> SpearmanResult {
    let n = x.len().min(y.len());
    if n < 3 {
        return SpearmanResult::default();
    }

    let rho = pearson(&ranks(&x[..n]), &ranks(&y[..n]));
    let residual = (1.0 - rho * rho).max(0.0);
    let dof = (n - 2) as f64;

    let t = if rho == 0.0 {
        0.0
    } else {
        rho * (dof / residual).sqrt()
    };
    let se = (residual / dof).sqrt();

    SpearmanResult {
        rho,
        p_value: t_p_value(t, n - 2),
        ci95: (
            (rho - 1.96 * se).max(-1.0),
            (rho + 1.96 * se).min(1.0),
        ),
    }
}

/// One-sample t-test of `values` against `test_value`.
///
/// Fewer than two values or zero spread gives `t = 0, p = 1`.
pub fn t_test(values: &[f64], test_value: f64) -> TTestResult {
    let n = values.len();
    let df = n.saturating_sub(1);
    let sd = std_dev(values);
    if n < 2 || sd == 0.0 {
        return TTestResult {
            t: 0.0,
            df,
            p_value: 1.0,
        };
    }

    let se = sd / (n as f64).sqrt();
    let t = (mean(values) - test_value) / se;
    TTestResult {
        t,
        df,
        p_value: t_p_value(t, df),
    }
}

/// Kendall's W over `rankings`, one row of `k` ranks per respondent.
///
/// Item count comes from the first row; short rows are zero-filled.
pub fn kendall_w(rankings: &[Vec<f64>]) -> KendallWResult {
    let n = rankings.len();
    let k = rankings.first().map_or(0, Vec::len);
    if n == 0 || k < 2 {
        return KendallWResult {
            w: 0.0,
            chi_square: 0.0,
            df: k.saturating_sub(1),
            p_value: 1.0,
        };
    }

    let mut rank_sums = vec![0.0; k];
    for row in rankings {
        for (j, sum) in rank_sums.iter_mut().enumerate() {
            let r = row.get(j).copied().unwrap_or(DEFAULT_FILL);
            *sum += if r.is_finite() { r } else { DEFAULT_FILL };
        }
    }

    let mean_rank_sum = mean(&rank_sums);
    let s: f64 = rank_sums.iter().map(|r| (r - mean_rank_sum).powi(2)).sum();

    let (nf, kf) = (n as f64, k as f64);
    let w = (12.0 * s) / (nf * nf * (kf.powi(3) - kf));
    let chi_square = nf * (kf - 1.0) * w;
    let df = k - 1;

    KendallWResult {
        w,
        chi_square,
        df,
        p_value: chi_square_p_value(chi_square, df),
    }
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let x = coerce_all(&x[..n]);
    let y = coerce_all(&y[..n]);
    let (mx, my) = (mean(&x), mean(&y));

    let mut numerator = 0.0;
    let mut sum_x_sq = 0.0;
    let mut sum_y_sq = 0.0;
    for (a, b) in x.iter().zip(&y) {
        let dx = a - mx;
        let dy = b - my;
        numerator += dx * dy;
        sum_x_sq += dx * dx;
        sum_y_sq += dy * dy;
    }

    let denominator = (sum_x_sq * sum_y_sq).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn noise_items(rng: &mut StdRng, k: usize, n: usize) -> Vec<Vec<f64>> {
        (0..k)
            .map(|_| (0..n).map(|_| rng.gen_range(1..=5) as f64).collect())
            .collect()
    }

    // ==== cronbach alpha tests ====

    #[test]
    fn test_alpha_needs_two_items() {
        assert_eq!(cronbach_alpha(&[]), 0.0);
        assert_eq!(cronbach_alpha(&[vec![1.0, 2.0, 3.0]]), 0.0);
    }

    #[test]
    fn test_alpha_constant_total_is_zero() {
        let items = vec![vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]];
        assert_eq!(cronbach_alpha(&items), 0.0);
    }

    #[test]
    fn test_alpha_identical_items_is_one() {
        let item = vec![1.0, 2.0, 4.0, 5.0, 3.0, 2.0];
        for k in [2, 4, 8] {
            let items = vec![item.clone(); k];
            assert!((cronbach_alpha(&items) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_alpha_independent_noise_is_low() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = noise_items(&mut rng, 10, 500);
        assert!(cronbach_alpha(&items) < 0.3);
    }

    // ==== correlation tests ====

    #[test]
    fn test_item_total_correlation() {
        let item = [1.0, 2.0, 3.0, 4.0];
        assert!((item_total_correlation(&item, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-12);
        assert_eq!(item_total_correlation(&item, &[5.0, 5.0, 5.0, 5.0]), 0.0);
        assert_eq!(item_total_correlation(&[], &[]), 0.0);
    }

    #[test]
    fn test_ranks_sort_position_without_averaging() {
        assert_eq!(ranks(&[30.0, 10.0, 20.0]), vec![3.0, 1.0, 2.0]);
        assert_eq!(ranks(&[5.0, 5.0, 1.0]), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_spearman_identical_series() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let result = spearman_rho(&x, &x);
        assert!((result.rho - 1.0).abs() < 1e-12);
        assert_eq!(result.p_value, 0.01);
        assert!(result.ci95.1 <= 1.0);
    }

    #[test]
    fn test_spearman_reversed_series() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [50.0, 40.0, 30.0, 20.0, 10.0];
        let result = spearman_rho(&x, &y);
        assert!((result.rho + 1.0).abs() < 1e-12);
        assert!(result.ci95.0 >= -1.0);
    }

    #[test]
    fn test_spearman_short_input() {
        assert_eq!(spearman_rho(&[1.0, 2.0], &[1.0, 2.0]), SpearmanResult::default());
    }

    // ==== t-test tests ====

    #[test]
    fn test_t_test_against_reference() {
        let values = [60.0, 70.0, 65.0, 75.0, 80.0, 62.0];
        let result = t_test(&values, 50.0);
        assert_eq!(result.df, 5);
        assert!(result.t > 2.75);
        assert_eq!(result.p_value, 0.01);
    }

    #[test]
    fn test_t_test_degenerate() {
        assert_eq!(t_test(&[50.0], 50.0).p_value, 1.0);
        let constant = t_test(&[70.0, 70.0, 70.0], 50.0);
        assert_eq!(constant.t, 0.0);
        assert_eq!(constant.p_value, 1.0);
        assert_eq!(constant.df, 2);
    }

    // ==== kendall w tests ====

    #[test]
    fn test_kendall_w_perfect_agreement() {
        let ranking = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let rankings = vec![ranking; 12];
        let result = kendall_w(&rankings);
        assert!((result.w - 1.0).abs() < 1e-12);
        assert_eq!(result.df, 5);
        assert!((result.chi_square - 60.0).abs() < 1e-9);
        assert_eq!(result.p_value, 0.05);
    }

    #[test]
    fn test_kendall_w_opposed_rankings() {
        let rankings = vec![vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]];
        assert_eq!(kendall_w(&rankings).w, 0.0);
    }

    #[test]
    fn test_kendall_w_empty() {
        let result = kendall_w(&[]);
        assert_eq!(result.w, 0.0);
        assert_eq!(result.p_value, 1.0);
    }
}
