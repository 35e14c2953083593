//! Plain-language summary of a cross-tab.

use super::engine::CrossTab;
use crate::config::AnalysisConfig;
use crate::interpretation::{cramers_v_band, direction, spearman_band};
use crate::stats::pvalue::significance_stars;
use crate::utils::format_code;

/// One paragraph describing the association test, the ordinal correlation
/// (when both variables are ordinal) and any sparse-table caveat.
pub fn summarize(tab: &CrossTab, config: &AnalysisConfig) -> String {
    let chi = &tab.chi_square;
    let significant = chi.p_value <= config.significance_level;

    let mut summary = format!(
        "There is {} association between {} and {} (χ²={:.2}, df={}, p={:.4}{}, V={:.2}). \
         The effect size is {}",
        if significant {
            "a statistically significant"
        } else {
            "no statistically significant"
        },
        tab.row_label,
        tab.col_label,
        chi.chi_square,
        chi.df,
        chi.p_value,
        significance_stars(chi.p_value),
        tab.cramers_v,
        cramers_v_band(tab.cramers_v),
    );

    if let Some(rho) = &tab.spearman {
        if rho.p_value <= config.significance_level {
            summary.push_str(&format!(
                ". The ordinal association is a {} {} correlation (ρ={:.3}, p={:.4})",
                spearman_band(rho.rho),
                direction(rho.rho),
                rho.rho,
                rho.p_value
            ));
        } else {
            summary.push_str(&format!(
                ". The ordinal association is not statistically significant (ρ={:.3}, p={:.4})",
                rho.rho, rho.p_value
            ));
        }
    }

    summary.push('.');

    if tab.expected_warning {
        summary.push_str(&format!(
            " Results should be interpreted with caution because more than {} percent of cells \
             have expected counts below {}.",
            format_code((config.low_expected_fraction * 100.0).round()),
            format_code(config.min_expected_count),
        ));
    }

    summary
}
