//! Statistical primitives.
//!
//! Every function here is pure and total: inputs are coerced with the
//! safe-number policy, degenerate samples return documented defaults and no
//! result is ever NaN.
//!
//! - [`descriptive`]: central tendency, spread, percentiles, Likert summaries
//! - [`reliability`]: Cronbach's alpha, Spearman's rho, Kendall's W, t-test
//! - [`contingency`]: chi-square tests, expected frequencies, Cramér's V
//! - [`pvalue`]: the bucketed p-value tables shared by the tests above

pub mod contingency;
pub mod descriptive;
pub mod pvalue;
pub mod reliability;

pub use contingency::{
    ChiSquareResult, chi_square_goodness_of_fit, chi_square_independence, chi_square_uniform,
    cramers_v, expected_frequencies, expected_frequency_warning,
};
pub use descriptive::{
    DescriptiveStats, LikertBucket, LikertSummary, confidence_interval, describe, likert_summary,
    mean, median, mode, percentage, percentile, skewness, standard_error, std_dev,
};
pub use pvalue::{chi_square_p_value, significance_stars, t_p_value};
pub use reliability::{
    KendallWResult, SpearmanResult, TTestResult, cronbach_alpha, item_total_correlation,
    kendall_w, ranks, spearman_rho, t_test, total_scores,
};
