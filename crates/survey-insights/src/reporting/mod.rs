//! Report generation module.
//!
//! [`SurveyReport`] gathers every dashboard statistic for one respondent set:
//! Likert summaries, scale reliability, ranking agreement, competitor
//! t-tests, single-choice distributions, composite index means and NPS with
//! its segments. It is used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use survey_insights::config::AnalysisConfig;
//! use survey_insights::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new("output".into(), AnalysisConfig::default());
//! let report = generator.build_report(&records, Some("survey.csv"), None)?;
//! generator.write_report_to_file(&report, "survey")?;
//! ```

mod generator;

pub use generator::{
    ChoiceDistribution, ChoiceOption, CompetitorRating, ItemTotal, LikertItem, NostalgiaSummary,
    NpsSegment, RankedItem, RankingAnalysis, ReportGenerator, ScaleReliability, SurveyReport,
};
