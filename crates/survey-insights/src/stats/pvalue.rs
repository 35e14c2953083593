//! Coarse p-value lookup tables.
//!
//! p-values are bucketed from a handful of critical values rather than
//! computed from the t or chi-square CDF. Results are therefore one of a
//! few fixed levels; callers must not read more precision into them.

/// Chi-square critical values at (0.05, 0.10) for the supported df.
const CHI_SQUARE_CRITICAL: [(usize, f64, f64); 4] = [
    (1, 3.841, 2.706),
    (2, 5.991, 4.605),
    (3, 7.815, 6.251),
    (5, 11.070, 9.236),
];

/// Two-sided t critical values at (0.01, 0.05, 0.10), small samples.
const T_CRITICAL_SMALL: (f64, f64, f64) = (2.750, 2.042, 1.697);

/// Two-sided t critical values at (0.01, 0.05, 0.10), df > 30.
const T_CRITICAL_LARGE: (f64, f64, f64) = (2.576, 1.960, 1.645);

/// Bucketed p-value for a chi-square statistic.
///
/// Degrees of freedom outside {1, 2, 3, 5} use the df = 1 thresholds.
pub fn chi_square_p_value(chi_square: f64, df: usize) -> f64 {
    let (_, p05, p10) = CHI_SQUARE_CRITICAL
        .iter()
        .copied()
        .find(|(d, _, _)| *d == df)
        .unwrap_or(CHI_SQUARE_CRITICAL[0]);

    if chi_square >= p05 {
        0.05
    } else if chi_square >= p10 {
        0.10
    } else {
        0.20
    }
}

/// Bucketed two-sided p-value for a t statistic.
pub fn t_p_value(t: f64, df: usize) -> f64 {
    let (p01, p05, p10) = if df <= 30 {
        T_CRITICAL_SMALL
    } else {
        T_CRITICAL_LARGE
    };

    let t = t.abs();
    if t >= p01 {
        0.01
    } else if t >= p05 {
        0.05
    } else if t >= p10 {
        0.10
    } else {
        0.20
    }
}

/// Significance stars for summaries.
pub fn significance_stars(p_value: f64) -> &'static str {
    if p_value < 0.001 {
        "***"
    } else if p_value < 0.01 {
        "**"
    } else if p_value < 0.05 {
        "*"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chi_square_buckets_df1() {
        assert_eq!(chi_square_p_value(4.0, 1), 0.05);
        assert_eq!(chi_square_p_value(3.0, 1), 0.10);
        assert_eq!(chi_square_p_value(1.0, 1), 0.20);
    }

    #[test]
    fn test_chi_square_buckets_df5() {
        assert_eq!(chi_square_p_value(11.07, 5), 0.05);
        assert_eq!(chi_square_p_value(10.0, 5), 0.10);
        assert_eq!(chi_square_p_value(4.0, 5), 0.20);
    }

    #[test]
    fn test_chi_square_unsupported_df_falls_back() {
        // df = 4 is not tabulated
        assert_eq!(chi_square_p_value(4.0, 4), 0.05);
        assert_eq!(chi_square_p_value(0.0, 0), 0.20);
    }

    #[test]
    fn test_t_buckets_small_and_large_df() {
        assert_eq!(t_p_value(2.8, 10), 0.01);
        assert_eq!(t_p_value(-2.1, 10), 0.05);
        assert_eq!(t_p_value(2.0, 10), 0.10);
        assert_eq!(t_p_value(2.0, 100), 0.05);
        assert_eq!(t_p_value(0.5, 100), 0.20);
    }

    #[test]
    fn test_stars() {
        assert_eq!(significance_stars(0.0005), "***");
        assert_eq!(significance_stars(0.005), "**");
        assert_eq!(significance_stars(0.01), "*");
        assert_eq!(significance_stars(0.05), "");
    }
}
