//! Generic cross-tabulation of any two survey variables.
//!
//! The engine is driven by the [`variables::CATALOG`]: a caller picks two
//! variables (raw fields or derived bins) at runtime and gets back a
//! [`CrossTab`] with observed and expected counts, margins, chi-square test,
//! Cramér's V, Spearman's rho for ordinal pairs and a one-paragraph summary.
//!
//! # Example
//!
//! ```rust,ignore
//! use survey_insights::config::{AnalysisConfig, DisplayMode};
//! use survey_insights::crosstab::CrossTabEngine;
//!
//! let engine = CrossTabEngine::new(AnalysisConfig::default());
//! let tab = engine.run_by_key(&records, "age_group", "nps_category", DisplayMode::RowPercent)?;
//! println!("{}", tab.summary);
//! ```

mod engine;
mod summary;
pub mod variables;

pub use engine::{CrossTab, CrossTabEngine};
pub use summary::summarize;
pub use variables::{CATALOG, Labeler, Variable, VariableKind, VariableSource, find_variable};
