//! Null tokens, column type inference and typed cell parsing.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{ImputerError, Result};
use crate::frame::Cell;
use crate::schema::DataType;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Check if a value represents a missing/null value.
pub fn is_null_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed == "."
        || trimmed == "-"
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Infer the narrowest type that every non-null value parses as.
///
/// Columns with no observed values are strings.
pub fn infer_type<'a>(values: impl IntoIterator<Item = &'a str>) -> DataType {
    let observed: Vec<&str> = values.into_iter().map(str::trim).collect();
    if observed.is_empty() {
        return DataType::String;
    }

    let ints: Option<Vec<i64>> = observed.iter().map(|v| v.parse().ok()).collect();
    if let Some(ints) = ints {
        return if ints.iter().all(|v| i32::try_from(*v).is_ok()) {
            DataType::Integer
        } else {
            DataType::Long
        };
    }
    if observed.iter().all(|v| v.parse::<f64>().is_ok()) {
        return DataType::Double;
    }
    if observed.iter().all(|v| parse_bool(v).is_some()) {
        return DataType::Boolean;
    }
    if observed.iter().all(|v| parse_date(v).is_some()) {
        return DataType::Date;
    }
    if observed.iter().all(|v| parse_timestamp(v).is_some()) {
        return DataType::Timestamp;
    }
    DataType::String
}

/// Parse one non-null value into a cell of the given type.
///
/// `row` and `column` are 1-based positions used in error messages.
pub fn parse_cell(value: &str, data_type: DataType, row: usize, column: usize) -> Result<Cell> {
    let invalid = || ImputerError::Parse {
        row,
        column,
        message: format!("'{}' is not a valid {}", value, data_type),
    };
    let trimmed = value.trim();

    let cell = match data_type {
        DataType::Integer => {
            let v: i32 = trimmed.parse().map_err(|_| invalid())?;
            Cell::Int(i64::from(v))
        }
        DataType::Long => Cell::Int(trimmed.parse().map_err(|_| invalid())?),
        DataType::Float => {
            let v: f32 = trimmed.parse().map_err(|_| invalid())?;
            Cell::Float(f64::from(v))
        }
        DataType::Double => Cell::Float(trimmed.parse().map_err(|_| invalid())?),
        DataType::Boolean => Cell::Bool(parse_bool(trimmed).ok_or_else(invalid)?),
        DataType::Date => Cell::Date(parse_date(trimmed).ok_or_else(invalid)?),
        DataType::Timestamp => Cell::Timestamp(parse_timestamp(trimmed).ok_or_else(invalid)?),
        DataType::String => Cell::Text(value.to_string()),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null_value() {
        assert!(is_null_value(""));
        assert!(is_null_value("NA"));
        assert!(is_null_value("na"));
        assert!(is_null_value("N/A"));
        assert!(is_null_value("null"));
        assert!(is_null_value("NULL"));
        assert!(is_null_value("."));
        assert!(!is_null_value("value"));
        assert!(!is_null_value("0"));
    }

    #[test]
    fn test_infer_numeric() {
        assert_eq!(infer_type(["1", "2", "-3"]), DataType::Integer);
        assert_eq!(infer_type(["1", "3000000000"]), DataType::Long);
        assert_eq!(infer_type(["1", "2.5"]), DataType::Double);
    }

    #[test]
    fn test_infer_other_types() {
        assert_eq!(infer_type(["true", "FALSE"]), DataType::Boolean);
        assert_eq!(infer_type(["2024-01-31"]), DataType::Date);
        assert_eq!(
            infer_type(["2024-01-31 10:00:00", "2024-02-01T08:30:00"]),
            DataType::Timestamp
        );
        assert_eq!(infer_type(["1", "x"]), DataType::String);
        assert_eq!(infer_type(Vec::<&str>::new()), DataType::String);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(" 42 ", DataType::Integer, 1, 1).unwrap(), Cell::Int(42));
        assert_eq!(parse_cell("true", DataType::Boolean, 1, 1).unwrap(), Cell::Bool(true));
        assert_eq!(
            parse_cell(" a ", DataType::String, 1, 1).unwrap(),
            Cell::Text(" a ".to_string())
        );
        assert!(matches!(
            parse_cell("4000000000", DataType::Integer, 3, 2),
            Err(ImputerError::Parse { row: 3, column: 2, .. })
        ));
    }
}
