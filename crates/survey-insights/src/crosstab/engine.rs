//! Contingency-table construction and statistics.

use std::fmt::Write as _;
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::summary;
use super::variables::{Variable, find_variable};
use crate::config::{AnalysisConfig, DisplayMode};
use crate::error::{Result, SurveyError};
use crate::interpretation::interpret_cramers_v;
use crate::stats::contingency::{
    ChiSquareResult, chi_square_independence, cramers_v, expected_frequencies,
    expected_frequency_warning,
};
use crate::stats::pvalue::significance_stars;
use crate::stats::reliability::{SpearmanResult, spearman_rho};
use crate::survey::Respondent;

/// A finished cross-tabulation of two variables.
///
/// Counts are fixed by the variables' domains; the display mode only changes
/// how [`CrossTab::cell_display`] renders them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossTab {
    pub row_key: String,
    pub col_key: String,
    pub row_label: String,
    pub col_label: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub observed: Vec<Vec<usize>>,
    pub expected: Vec<Vec<f64>>,
    pub row_totals: Vec<usize>,
    pub col_totals: Vec<usize>,
    pub grand_total: usize,
    /// Respondents with a missing or out-of-domain value on either axis.
    pub excluded: usize,
    pub chi_square: ChiSquareResult,
    pub cramers_v: f64,
    pub expected_warning: bool,
    /// Present only when both variables are ordinal.
    pub spearman: Option<SpearmanResult>,
    pub display_mode: DisplayMode,
    pub summary: String,
}

impl CrossTab {
    /// Render a cell under the table's display mode.
    pub fn cell_display(&self, row: usize, col: usize) -> String {
        self.cell_display_as(row, col, self.display_mode)
    }

    /// Render a cell under an explicit display mode.
    ///
    /// Percentages with a zero denominator render as `0.0%`.
    pub fn cell_display_as(&self, row: usize, col: usize, mode: DisplayMode) -> String {
        let count = self
            .observed
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0);
        let share = |denominator: usize| {
            if denominator == 0 {
                0.0
            } else {
                count as f64 / denominator as f64 * 100.0
            }
        };

        match mode {
            DisplayMode::Frequency => count.to_string(),
            DisplayMode::RowPercent => {
                format!("{:.1}%", share(self.row_totals.get(row).copied().unwrap_or(0)))
            }
            DisplayMode::ColumnPercent => {
                format!("{:.1}%", share(self.col_totals.get(col).copied().unwrap_or(0)))
            }
            DisplayMode::ChiSquare | DisplayMode::EffectSize => {
                format!("{} ({:.1}%)", count, share(self.grand_total))
            }
        }
    }

    /// Plain-text statistics block for pasting into notes.
    pub fn stats_text(&self) -> String {
        let mut text = String::from("Chi-Square Test Results:\n");
        let _ = writeln!(text, "χ² = {:.3}", self.chi_square.chi_square);
        let _ = writeln!(text, "df = {}", self.chi_square.df);
        let _ = writeln!(
            text,
            "p = {:.4}{}",
            self.chi_square.p_value,
            significance_stars(self.chi_square.p_value)
        );
        let _ = writeln!(text, "Cramér's V = {:.3}", self.cramers_v);
        let _ = writeln!(text, "Effect Size: {}", interpret_cramers_v(self.cramers_v));

        if let Some(rho) = &self.spearman {
            text.push_str("\nSpearman's Rho:\n");
            let _ = writeln!(text, "ρ = {:.3}", rho.rho);
            let _ = writeln!(text, "p = {:.4}", rho.p_value);
            let _ = writeln!(text, "95% CI: [{:.3} - {:.3}]", rho.ci95.0, rho.ci95.1);
        }
        text
    }

    /// Observed counts with margins as a string-typed frame.
    ///
    /// The first column holds row labels and is named after the row variable;
    /// the last row and column hold totals.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut header: Vec<String> = self.row_labels.clone();
        header.push("Total".to_string());

        let mut columns = vec![Column::new(self.row_label.as_str().into(), header)];
        for (j, label) in self.col_labels.iter().enumerate() {
            let mut cells: Vec<String> = self.observed.iter().map(|r| r[j].to_string()).collect();
            cells.push(self.col_totals[j].to_string());
            columns.push(Column::new(label.as_str().into(), cells));
        }

        let mut totals: Vec<String> = self.row_totals.iter().map(usize::to_string).collect();
        totals.push(self.grand_total.to_string());
        columns.push(Column::new("Total".into(), totals));

        DataFrame::new(columns)
    }

    /// CSV export: the count table followed by the test statistics.
    pub fn to_csv(&self) -> Result<String> {
        let mut frame = self.to_frame()?;
        let mut buffer: Vec<u8> = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut frame)?;

        let mut csv = String::from_utf8_lossy(&buffer).into_owned();
        csv.push('\n');
        let _ = writeln!(csv, "Chi-Square,{:.3}", self.chi_square.chi_square);
        let _ = writeln!(csv, "df,{}", self.chi_square.df);
        let _ = writeln!(csv, "p-value,{:.4}", self.chi_square.p_value);
        let _ = writeln!(csv, "Cramér's V,{:.3}", self.cramers_v);
        Ok(csv)
    }

    /// Write [`CrossTab::to_csv`] to `dir/crosstab_{row}_{col}.csv`.
    pub fn write_csv(&self, dir: &Path) -> Result<std::path::PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("crosstab_{}_{}.csv", self.row_key, self.col_key));
        std::fs::write(&path, self.to_csv()?)?;
        info!("Cross-tab saved: {}", path.display());
        Ok(path)
    }
}

/// Builds cross-tabs for any pair of catalog variables.
#[derive(Debug, Clone, Default)]
pub struct CrossTabEngine {
    config: AnalysisConfig,
}

impl CrossTabEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Cross-tabulate two variables looked up by key.
    pub fn run_by_key(
        &self,
        records: &[Respondent],
        row_key: &str,
        col_key: &str,
        mode: DisplayMode,
    ) -> Result<CrossTab> {
        let row = find_variable(row_key)
            .ok_or_else(|| SurveyError::UnknownVariable(row_key.to_string()))?;
        let col = find_variable(col_key)
            .ok_or_else(|| SurveyError::UnknownVariable(col_key.to_string()))?;
        Ok(self.run(records, row, col, mode))
    }

    /// Cross-tabulate `row` against `col` over `records`.
    pub fn run(
        &self,
        records: &[Respondent],
        row: &Variable,
        col: &Variable,
        mode: DisplayMode,
    ) -> CrossTab {
        let (rows, cols) = (row.domain.len(), col.domain.len());
        let mut observed = vec![vec![0usize; cols]; rows];
        let mut excluded = 0usize;

        for record in records {
            let cell = row
                .value(record)
                .and_then(|v| row.domain_index(v))
                .zip(col.value(record).and_then(|v| col.domain_index(v)));
            match cell {
                Some((i, j)) => observed[i][j] += 1,
                None => excluded += 1,
            }
        }

        let row_totals: Vec<usize> = observed.iter().map(|r| r.iter().sum()).collect();
        let col_totals: Vec<usize> = (0..cols)
            .map(|j| observed.iter().map(|r| r[j]).sum())
            .collect();
        let grand_total: usize = row_totals.iter().sum();

        debug!(
            "Cross-tab {} x {}: {} counted, {} excluded",
            row.key, col.key, grand_total, excluded
        );

        let counts: Vec<Vec<f64>> = observed
            .iter()
            .map(|r| r.iter().map(|c| *c as f64).collect())
            .collect();
        let expected = expected_frequencies(&counts);
        let chi_square = chi_square_independence(&counts, &expected);
        let v = cramers_v(chi_square.chi_square, grand_total as f64, rows, cols);
        let expected_warning = expected_frequency_warning(
            &expected,
            self.config.min_expected_count,
            self.config.low_expected_fraction,
        );
        if expected_warning {
            warn!(
                "Sparse table for {} x {}: expected counts below {} in more than {:.0}% of cells",
                row.key,
                col.key,
                self.config.min_expected_count,
                self.config.low_expected_fraction * 100.0
            );
        }

        let spearman = (row.is_ordinal() && col.is_ordinal()).then(|| {
            let (x, y): (Vec<f64>, Vec<f64>) = records
                .iter()
                .filter_map(|r| row.value(r).zip(col.value(r)))
                .unzip();
            spearman_rho(&x, &y)
        });

        let mut tab = CrossTab {
            row_key: row.key.to_string(),
            col_key: col.key.to_string(),
            row_label: row.label.to_string(),
            col_label: col.label.to_string(),
            row_labels: row.domain_labels(),
            col_labels: col.domain_labels(),
            observed,
            expected,
            row_totals,
            col_totals,
            grand_total,
            excluded,
            chi_square,
            cramers_v: v,
            expected_warning,
            spearman,
            display_mode: mode,
            summary: String::new(),
        };
        tab.summary = summary::summarize(&tab, &self.config);
        tab
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::Field;
    use pretty_assertions::assert_eq;

    fn respondents(pairs: &[(f64, f64)]) -> Vec<Respondent> {
        pairs
            .iter()
            .map(|(age, nps)| {
                Respondent::default()
                    .with(Field::AgeGroup, *age)
                    .with(Field::Q19Nps, *nps)
            })
            .collect()
    }

    fn engine() -> CrossTabEngine {
        CrossTabEngine::new(AnalysisConfig::default())
    }

    #[test]
    fn test_shape_follows_domains() {
        let records = respondents(&[(1.0, 5.0), (2.0, 4.0)]);
        let tab = engine()
            .run_by_key(&records, "age_group", "q19_nps_little_tikes_1_5", DisplayMode::Frequency)
            .unwrap();
        assert_eq!(tab.observed.len(), 6);
        assert_eq!(tab.observed[0].len(), 5);
        assert_eq!(tab.observed[0][4], 1);
        assert_eq!(tab.observed[1][3], 1);
        assert_eq!(tab.row_labels[0], "18-24");
        assert_eq!(tab.col_labels[4], "Score 5");
    }

    #[test]
    fn test_margins_agree() {
        let records = respondents(&[
            (1.0, 5.0),
            (1.0, 4.0),
            (2.0, 3.0),
            (3.0, 1.0),
            (6.0, 2.0),
            (6.0, 5.0),
        ]);
        let tab = engine()
            .run_by_key(&records, "age_group", "nps_category", DisplayMode::RowPercent)
            .unwrap();
        let row_sum: usize = tab.row_totals.iter().sum();
        let col_sum: usize = tab.col_totals.iter().sum();
        let cell_sum: usize = tab.observed.iter().flatten().sum();
        assert_eq!(row_sum, tab.grand_total);
        assert_eq!(col_sum, tab.grand_total);
        assert_eq!(cell_sum, tab.grand_total);
        assert_eq!(tab.grand_total, 6);
        // nps_category is categorical
        assert!(tab.spearman.is_none());
    }

    #[test]
    fn test_out_of_domain_and_missing_are_excluded() {
        let mut records = respondents(&[(1.0, 5.0), (7.0, 5.0), (2.0, 0.0)]);
        records.push(Respondent::default().with(Field::AgeGroup, 1.0));
        let tab = engine()
            .run_by_key(&records, "age_group", "q19_nps_little_tikes_1_5", DisplayMode::Frequency)
            .unwrap();
        assert_eq!(tab.grand_total, 1);
        assert_eq!(tab.excluded, 3);
    }

    #[test]
    fn test_unknown_variable() {
        let err = engine()
            .run_by_key(&[], "age_group", "shoe_size", DisplayMode::Frequency)
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_VARIABLE");
        assert!(err.to_string().contains("shoe_size"));
    }

    #[test]
    fn test_spearman_for_ordinal_pair() {
        let records = respondents(&[
            (1.0, 1.0),
            (2.0, 2.0),
            (3.0, 3.0),
            (4.0, 4.0),
            (5.0, 5.0),
            (6.0, 5.0),
        ]);
        let tab = engine()
            .run_by_key(&records, "age_group", "q19_nps_little_tikes_1_5", DisplayMode::Frequency)
            .unwrap();
        let rho = tab.spearman.unwrap();
        assert!(rho.rho > 0.9);
    }

    #[test]
    fn test_cell_display_modes() {
        let records = respondents(&[(1.0, 5.0), (1.0, 4.0), (2.0, 5.0), (2.0, 5.0)]);
        let tab = engine()
            .run_by_key(&records, "age_group", "q19_nps_little_tikes_1_5", DisplayMode::RowPercent)
            .unwrap();
        assert_eq!(tab.cell_display(0, 4), "50.0%");
        assert_eq!(tab.cell_display_as(0, 4, DisplayMode::Frequency), "1");
        assert_eq!(tab.cell_display_as(0, 4, DisplayMode::ColumnPercent), "33.3%");
        assert_eq!(tab.cell_display_as(1, 4, DisplayMode::ChiSquare), "2 (50.0%)");
        // empty row and empty column
        assert_eq!(tab.cell_display(5, 0), "0.0%");
        assert_eq!(tab.cell_display_as(0, 0, DisplayMode::ColumnPercent), "0.0%");
    }

    #[test]
    fn test_to_csv_layout() {
        let records = respondents(&[(1.0, 1.0), (2.0, 2.0)]);
        let tab = engine()
            .run_by_key(&records, "age_group", "nps_category", DisplayMode::Frequency)
            .unwrap();
        let csv = tab.to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Age Group,Detractor,Passive,Promoter,Total");
        assert_eq!(lines[1], "18-24,1,0,0,1");
        assert_eq!(lines[7], "Total,2,0,0,2");
        assert!(csv.contains("\ndf,"));
        assert!(csv.contains("Cramér's V,"));
    }

    #[test]
    fn test_stats_text() {
        let records = respondents(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let tab = engine()
            .run_by_key(&records, "age_group", "q19_nps_little_tikes_1_5", DisplayMode::Frequency)
            .unwrap();
        let text = tab.stats_text();
        assert!(text.starts_with("Chi-Square Test Results:"));
        assert!(text.contains("Spearman's Rho:"));
    }
}
