//! Configuration types for survey analysis.
//!
//! This module provides configuration options using the builder pattern.
//! Defaults reproduce the dashboard's conventions (95% intervals, p ≤ 0.05,
//! the "more than 20% of cells under 5" chi-square heuristic).

use serde::{Deserialize, Serialize};

/// How a cross-tab cell is rendered. Never changes the underlying counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Raw cell counts
    Frequency,
    /// Percentage of the row total
    #[default]
    #[serde(rename = "row_pct")]
    RowPercent,
    /// Percentage of the column total
    #[serde(rename = "col_pct")]
    ColumnPercent,
    /// Count annotated with share of the grand total, chi-square view
    ChiSquare,
    /// Count annotated with share of the grand total, effect-size view
    EffectSize,
}

/// Configuration for statistical analysis.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use survey_insights::config::{AnalysisConfig, DisplayMode};
///
/// let config = AnalysisConfig::builder()
///     .significance_level(0.10)
///     .display_mode(DisplayMode::ColumnPercent)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// p-value at or below which a result is reported as significant.
    /// Default: 0.05
    pub significance_level: f64,

    /// z multiplier for confidence intervals.
    /// Default: 1.96
    pub confidence_z: f64,

    /// Expected cell count under which a chi-square cell is considered sparse.
    /// Default: 5.0
    pub min_expected_count: f64,

    /// Fraction of sparse cells above which the expected-frequency warning fires.
    /// Default: 0.20
    pub low_expected_fraction: f64,

    /// Reference value for one-sample t-tests on 0-100 ratings.
    /// Default: 50.0
    pub t_test_reference: f64,

    /// Cross-tab rendering when the caller does not pick one.
    /// Default: RowPercent
    pub display_mode: DisplayMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            confidence_z: 1.96,
            min_expected_count: 5.0,
            low_expected_fraction: 0.20,
            t_test_reference: 50.0,
            display_mode: DisplayMode::default(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ConfigValidationError::InvalidProbability {
                field: "significance_level".to_string(),
                value: self.significance_level,
            });
        }

        if !(0.0..=1.0).contains(&self.low_expected_fraction) {
            return Err(ConfigValidationError::InvalidProbability {
                field: "low_expected_fraction".to_string(),
                value: self.low_expected_fraction,
            });
        }

        if !(self.confidence_z.is_finite() && self.confidence_z > 0.0) {
            return Err(ConfigValidationError::NonPositive {
                field: "confidence_z".to_string(),
                value: self.confidence_z,
            });
        }

        if !(self.min_expected_count.is_finite() && self.min_expected_count > 0.0) {
            return Err(ConfigValidationError::NonPositive {
                field: "min_expected_count".to_string(),
                value: self.min_expected_count,
            });
        }

        if !self.t_test_reference.is_finite() {
            return Err(ConfigValidationError::NotFinite(
                "t_test_reference".to_string(),
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid probability for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidProbability { field: String, value: f64 },

    #[error("Invalid value for '{field}': {value} (must be greater than 0)")]
    NonPositive { field: String, value: f64 },

    #[error("Invalid value for '{0}': must be a finite number")]
    NotFinite(String),
}

impl From<ConfigValidationError> for crate::error::SurveyError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::SurveyError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    significance_level: Option<f64>,
    confidence_z: Option<f64>,
    min_expected_count: Option<f64>,
    low_expected_fraction: Option<f64>,
    t_test_reference: Option<f64>,
    display_mode: Option<DisplayMode>,
}

impl AnalysisConfigBuilder {
    /// Set the significance level used in generated summaries.
    pub fn significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = Some(alpha);
        self
    }

    /// Set the z multiplier for confidence intervals (1.96 = 95%).
    pub fn confidence_z(mut self, z: f64) -> Self {
        self.confidence_z = Some(z);
        self
    }

    /// Set the expected count below which a cell is sparse.
    pub fn min_expected_count(mut self, count: f64) -> Self {
        self.min_expected_count = Some(count);
        self
    }

    /// Set the sparse-cell fraction that triggers the expected-frequency warning.
    pub fn low_expected_fraction(mut self, fraction: f64) -> Self {
        self.low_expected_fraction = Some(fraction);
        self
    }

    /// Set the reference value for one-sample t-tests.
    pub fn t_test_reference(mut self, value: f64) -> Self {
        self.t_test_reference = Some(value);
        self
    }

    /// Set the default cross-tab display mode.
    pub fn display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = Some(mode);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            significance_level: self
                .significance_level
                .unwrap_or(defaults.significance_level),
            confidence_z: self.confidence_z.unwrap_or(defaults.confidence_z),
            min_expected_count: self
                .min_expected_count
                .unwrap_or(defaults.min_expected_count),
            low_expected_fraction: self
                .low_expected_fraction
                .unwrap_or(defaults.low_expected_fraction),
            t_test_reference: self.t_test_reference.unwrap_or(defaults.t_test_reference),
            display_mode: self.display_mode.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.significance_level, 0.05);
        assert_eq!(config.confidence_z, 1.96);
        assert_eq!(config.min_expected_count, 5.0);
        assert_eq!(config.low_expected_fraction, 0.20);
        assert_eq!(config.display_mode, DisplayMode::RowPercent);
    }

    #[test]
    fn test_builder_defaults() {
        let config = AnalysisConfig::builder().build().unwrap();
        assert_eq!(config.significance_level, 0.05);
        assert_eq!(config.t_test_reference, 50.0);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .significance_level(0.10)
            .confidence_z(2.576)
            .min_expected_count(3.0)
            .display_mode(DisplayMode::Frequency)
            .build()
            .unwrap();

        assert_eq!(config.significance_level, 0.10);
        assert_eq!(config.confidence_z, 2.576);
        assert_eq!(config.min_expected_count, 3.0);
        assert_eq!(config.display_mode, DisplayMode::Frequency);
    }

    #[test]
    fn test_validation_invalid_significance() {
        let result = AnalysisConfig::builder().significance_level(1.5).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidProbability { .. }
        ));
    }

    #[test]
    fn test_validation_non_positive_z() {
        let result = AnalysisConfig::builder().confidence_z(0.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::NonPositive { .. }
        ));
    }

    #[test]
    fn test_validation_error_converts_to_survey_error() {
        let err: crate::error::SurveyError = AnalysisConfig::builder()
            .min_expected_count(-1.0)
            .build()
            .unwrap_err()
            .into();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "significance_level": 0.01,
            "confidence_z": 2.576,
            "min_expected_count": 5.0,
            "low_expected_fraction": 0.25,
            "t_test_reference": 60.0,
            "display_mode": "col_pct"
        }"#;

        let config: AnalysisConfig =
            serde_json::from_str(json).expect("Should deserialize from frontend JSON");

        assert_eq!(config.significance_level, 0.01);
        assert_eq!(config.low_expected_fraction, 0.25);
        assert_eq!(config.t_test_reference, 60.0);
        assert_eq!(config.display_mode, DisplayMode::ColumnPercent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_display_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&DisplayMode::RowPercent).unwrap(),
            "\"row_pct\""
        );
        assert_eq!(
            serde_json::to_string(&DisplayMode::EffectSize).unwrap(),
            "\"effect_size\""
        );
    }
}
