//! CSV ingestion into typed [`Respondent`] records.
//!
//! The file is read with every column as text so that stray markers ("N/A",
//! "75%", "1,250") can be parsed with the crate's own coercion rules instead
//! of failing schema inference. Missing columns are logged and left blank.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Result, ResultExt, SurveyError};
use crate::survey::{Field, Respondent};
use crate::utils::parse_numeric_string;

/// Read a survey CSV from disk.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Respondent>> {
    let path = path.as_ref();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Parsing {}", path.display()))?;

    info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    respondents_from_frame(&df)
}

/// Parse survey CSV text already held in memory.
pub fn parse_csv_str(text: &str) -> Result<Vec<Respondent>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
        .finish()?;
    respondents_from_frame(&df)
}

/// Convert a frame with survey columns into respondents.
///
/// String columns are parsed cell by cell; other dtypes are cast to `f64`
/// non-strictly, so unconvertible cells become `None`.
pub fn respondents_from_frame(df: &DataFrame) -> Result<Vec<Respondent>> {
    let height = df.height();
    if height == 0 {
        return Err(SurveyError::NoData);
    }

    // header -> actual column name, tolerant of stray whitespace and case
    let columns: HashMap<String, PlSmallStr> = df
        .get_column_names()
        .into_iter()
        .map(|name| (name.trim().to_ascii_lowercase(), name.clone()))
        .collect();

    let mut records = vec![Respondent::default(); height];
    let mut missing = Vec::new();

    for field in Field::ALL {
        let Some(actual) = columns.get(field.name()) else {
            missing.push(field.name());
            continue;
        };
        let series = df.column(actual.as_str())?.as_materialized_series();
        for (record, value) in records.iter_mut().zip(numeric_values(series)?) {
            record.set(*field, value);
        }
    }

    for name in Respondent::TEXT_COLUMNS {
        let Some(actual) = columns.get(*name) else {
            missing.push(*name);
            continue;
        };
        let series = df
            .column(actual.as_str())?
            .as_materialized_series()
            .cast(&DataType::String)?;
        for (record, value) in records.iter_mut().zip(series.str()?.into_iter()) {
            record.set_text(name, value.map(|s| s.trim().to_string()).unwrap_or_default());
        }
    }

    if !missing.is_empty() {
        warn!(
            "{} survey column(s) absent from input, left blank: {}",
            missing.len(),
            missing.join(", ")
        );
    }
    debug!("Built {} respondent records", records.len());

    Ok(records)
}

fn numeric_values(series: &Series) -> Result<Vec<Option<f64>>> {
    if series.dtype() == &DataType::String {
        return Ok(series
            .str()?
            .into_iter()
            .map(|cell| cell.and_then(parse_numeric_string))
            .collect());
    }

    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_with_numeric_and_text_columns() {
        let df = df![
            "age_group" => [Some(1i64), Some(3), None],
            "q19_nps_little_tikes_1_5" => [5.0, 4.0, 2.0],
            "platforms_selections" => ["1,2", "", "7"],
        ]
        .unwrap();

        let records = respondents_from_frame(&df).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].age_group, Some(1.0));
        assert_eq!(records[2].age_group, None);
        assert_eq!(records[1].q19_nps_little_tikes_1_5, Some(4.0));
        assert_eq!(records[0].platforms_selections, "1,2");
        // absent column
        assert_eq!(records[0].gender, None);
    }

    #[test]
    fn test_string_cells_are_parsed() {
        let df = df![
            "q11_nostalgia_little_tikes_0_100" => ["75%", "N/A", "abc"],
        ]
        .unwrap();
        let records = respondents_from_frame(&df).unwrap();
        assert_eq!(records[0].q11_nostalgia_little_tikes_0_100, Some(75.0));
        assert_eq!(records[1].q11_nostalgia_little_tikes_0_100, None);
        assert_eq!(records[2].q11_nostalgia_little_tikes_0_100, None);
    }

    #[test]
    fn test_header_whitespace_and_case() {
        let df = df![" Gender " => [2i64]].unwrap();
        let records = respondents_from_frame(&df).unwrap();
        assert_eq!(records[0].gender, Some(2.0));
    }

    #[test]
    fn test_empty_frame_is_no_data() {
        let df = DataFrame::empty();
        let err = respondents_from_frame(&df).unwrap_err();
        assert_eq!(err.error_code(), "NO_DATA");
    }

    #[test]
    fn test_parse_csv_str() {
        let text = "q_id,age_group,gender,platforms_selections\n\
                    R1,2,1,\"1,4\"\n\
                    R2,,2,3\n";
        let records = parse_csv_str(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].q_id, "R1");
        assert_eq!(records[0].platforms_selections, "1,4");
        assert_eq!(records[1].age_group, None);
        assert_eq!(records[1].gender, Some(2.0));
    }

    #[test]
    fn test_missing_file_is_io_or_polars_error() {
        let err = load_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err.error_code(), "POLARS_ERROR" | "IO_ERROR"));
        assert!(err.to_string().contains("here.csv"));
    }
}
