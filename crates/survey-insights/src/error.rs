//! Custom error types for survey analysis.
//!
//! Statistical functions never fail: bad numeric input is coerced and
//! degenerate samples return safe defaults. The errors below cover the
//! cases that should fail loudly instead, namely configuration mistakes
//! (an unknown cross-tab variable, an invalid threshold) and I/O around
//! loading and exporting.
//!
//! Errors are serializable so a frontend can render them directly.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for survey analysis.
#[derive(Error, Debug)]
pub enum SurveyError {
    /// A cross-tab variable key is not in the variable catalog.
    #[error("Unknown survey variable '{0}'")]
    UnknownVariable(String),

    /// A field name does not match any column of the survey schema.
    #[error("Unknown survey field '{0}'")]
    UnknownField(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dataset contains no respondents.
    #[error("No respondents loaded")]
    NoData,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SurveyError>,
    },
}

impl SurveyError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SurveyError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownVariable(_) => "UNKNOWN_VARIABLE",
            Self::UnknownField(_) => "UNKNOWN_FIELD",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoData => "NO_DATA",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if the caller can recover by showing "N/A" instead of a result.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NoData | Self::UnknownVariable(_) | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for SurveyError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SurveyError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for survey operations.
pub type Result<T> = std::result::Result<T, SurveyError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SurveyError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SurveyError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(SurveyError::NoData.error_code(), "NO_DATA");
        assert_eq!(
            SurveyError::UnknownVariable("shoe_size".to_string()).error_code(),
            "UNKNOWN_VARIABLE"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(SurveyError::NoData.is_recoverable());
        assert!(SurveyError::UnknownVariable("x".to_string()).is_recoverable());
        assert!(!SurveyError::UnknownField("x".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = SurveyError::UnknownVariable("shoe_size".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNKNOWN_VARIABLE"));
        assert!(json.contains("shoe_size"));
    }

    #[test]
    fn test_with_context() {
        let error =
            SurveyError::UnknownVariable("x".to_string()).with_context("Building cross-tab");
        assert!(error.to_string().contains("Building cross-tab"));
        assert_eq!(error.error_code(), "UNKNOWN_VARIABLE");
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_io_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = result.context("Reading survey file").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().starts_with("Reading survey file"));
    }
}
