//! Survey Insights Library
//!
//! Statistical computation layer for a parent survey about childhood toy
//! brands, nostalgia and purchase intent, built with Rust and Polars.
//!
//! # Overview
//!
//! - **Loading**: survey CSV into typed [`Respondent`] records with tolerant numeric parsing
//! - **Statistics**: descriptive stats, Likert summaries, chi-square, Cramér's V,
//!   Spearman's rho, Cronbach's alpha, Kendall's W, one-sample t-tests
//! - **Composite Indices**: nostalgia, trust, purchase intent, modernization,
//!   competitive strength, digital adoption and NPS
//! - **Cross-Tabulation**: any two catalog variables, with expected counts,
//!   tests, effect size and a plain-language summary
//! - **Filtering**: demographic and response filters applied before analysis
//! - **Reporting**: the full set of statistics as one JSON document
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use survey_insights::{AnalysisConfig, CrossTabEngine, DisplayMode, SurveyFilter};
//! use survey_insights::loader::load_csv;
//!
//! let records = load_csv("survey.csv")?;
//! let filter = SurveyFilter { genders: vec![2], ..Default::default() };
//! let subset = filter.apply(&records);
//!
//! let engine = CrossTabEngine::new(AnalysisConfig::default());
//! let tab = engine.run_by_key(&subset, "age_group", "nps_category", DisplayMode::RowPercent)?;
//! println!("{}", tab.summary);
//! ```
//!
//! # Configuration
//!
//! Use [`AnalysisConfig`] to change thresholds:
//!
//! ```rust,ignore
//! use survey_insights::config::*;
//!
//! let config = AnalysisConfig::builder()
//!     .significance_level(0.01)
//!     .min_expected_count(5.0)
//!     .t_test_reference(50.0)
//!     .display_mode(DisplayMode::ColumnPercent)
//!     .build()?;
//! ```

pub mod config;
pub mod crosstab;
pub mod error;
pub mod filter;
pub mod indices;
pub mod interpretation;
pub mod labels;
pub mod loader;
pub mod reporting;
pub mod stats;
pub mod survey;
pub mod utils;

// Re-exports for convenient access
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError, DisplayMode};
pub use crosstab::{CATALOG, CrossTab, CrossTabEngine, Variable, VariableKind, find_variable};
pub use error::{Result as SurveyResult, ResultExt, SurveyError};
pub use filter::{ChildrenFilter, SurveyFilter};
pub use indices::{DerivedIndices, IndexMeans, NpsBreakdown, ParentProfile, derive_indices, nps};
pub use reporting::{ReportGenerator, SurveyReport};
pub use survey::{Field, Respondent};
pub use utils::{parse_numeric_string, safe_number};
