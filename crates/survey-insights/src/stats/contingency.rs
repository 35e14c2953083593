//! Chi-square tests and effect sizes for categorical data.

use serde::{Deserialize, Serialize};

use super::pvalue::chi_square_p_value;

/// Chi-square statistic with degrees of freedom and bucketed p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareResult {
    pub chi_square: f64,
    pub df: usize,
    pub p_value: f64,
}

impl ChiSquareResult {
    fn empty() -> Self {
        Self {
            chi_square: 0.0,
            df: 0,
            p_value: 1.0,
        }
    }
}

/// Goodness-of-fit of `observed` against `expected` counts.
///
/// Categories with a non-positive expectation are skipped. Mismatched or
/// empty inputs give `{0, df 0, p 1}`.
pub fn chi_square_goodness_of_fit(observed: &[f64], expected: &[f64]) -> ChiSquareResult {
    if observed.len() != expected.len() || observed.is_empty() {
        return ChiSquareResult::empty();
    }

    let chi_square = observed
        .iter()
        .zip(expected)
        .filter(|(_, e)| **e > 0.0)
        .map(|(o, e)| (o - e).powi(2) / e)
        .sum();
    let df = observed.len() - 1;

    ChiSquareResult {
        chi_square,
        df,
        p_value: chi_square_p_value(chi_square, df),
    }
}

/// Goodness-of-fit against a uniform distribution over the categories.
pub fn chi_square_uniform(observed: &[f64]) -> ChiSquareResult {
    if observed.is_empty() {
        return ChiSquareResult::empty();
    }
    let total: f64 = observed.iter().sum();
    let expected = vec![total / observed.len() as f64; observed.len()];
    chi_square_goodness_of_fit(observed, &expected)
}

/// Test of independence for an R x C table.
pub fn chi_square_independence(observed: &[Vec<f64>], expected: &[Vec<f64>]) -> ChiSquareResult {
    let rows = observed.len();
    let cols = observed.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return ChiSquareResult::empty();
    }

    let mut chi_square = 0.0;
    for (obs_row, exp_row) in observed.iter().zip(expected) {
        for (o, e) in obs_row.iter().zip(exp_row) {
            if *e > 0.0 {
                chi_square += (o - e).powi(2) / e;
            }
        }
    }

    let df = (rows - 1) * (cols - 1);
    ChiSquareResult {
        chi_square,
        df,
        p_value: chi_square_p_value(chi_square, df),
    }
}

/// `expected[i][j] = row_total[i] * col_total[j] / grand_total`.
///
/// All zero when the grand total is 0.
pub fn expected_frequencies(observed: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let cols = observed.first().map_or(0, Vec::len);
    let row_totals: Vec<f64> = observed.iter().map(|row| row.iter().sum()).collect();
    let col_totals: Vec<f64> = (0..cols)
        .map(|j| observed.iter().map(|row| row.get(j).copied().unwrap_or(0.0)).sum())
        .collect();
    let grand_total: f64 = row_totals.iter().sum();

    row_totals
        .iter()
        .map(|rt| {
            col_totals
                .iter()
                .map(|ct| {
                    if grand_total == 0.0 {
                        0.0
                    } else {
                        rt * ct / grand_total
                    }
                })
                .collect()
        })
        .collect()
}

/// Cramér's V. 0 when either dimension is 1 or `n` is 0.
pub fn cramers_v(chi_square: f64, n: f64, rows: usize, cols: usize) -> f64 {
    let min_dim = rows.min(cols).saturating_sub(1);
    if min_dim == 0 || n <= 0.0 || chi_square <= 0.0 {
        return 0.0;
    }
    (chi_square / (n * min_dim as f64)).sqrt().min(1.0)
}

/// True when more than `max_fraction` of cells expect fewer than `min_count`.
pub fn expected_frequency_warning(expected: &[Vec<f64>], min_count: f64, max_fraction: f64) -> bool {
    let total_cells: usize = expected.iter().map(Vec::len).sum();
    if total_cells == 0 {
        return false;
    }
    let below = expected
        .iter()
        .flatten()
        .filter(|e| **e < min_count)
        .count();
    (below as f64 / total_cells as f64) > max_fraction
}
