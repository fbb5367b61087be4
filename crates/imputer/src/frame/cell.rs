//! Cell values stored in a frame column.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::schema::DataType;

/// A single value in a column.
///
/// Integer and long columns store `Int`; float and double columns store `Float`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Cell {
    /// Returns true for nulls and floating-point NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the cell; `None` for missing and non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Returns true if this cell may be stored in a column of the given type.
    pub fn conforms_to(&self, data_type: DataType) -> bool {
        match (self, data_type) {
            (Cell::Null, _) => true,
            (Cell::Int(v), DataType::Integer) => i32::try_from(*v).is_ok(),
            (Cell::Int(_), DataType::Long) => true,
            (Cell::Float(_), DataType::Float | DataType::Double) => true,
            (Cell::Text(_), DataType::String) => true,
            (Cell::Bool(_), DataType::Boolean) => true,
            (Cell::Date(_), DataType::Date) => true,
            (Cell::Timestamp(_), DataType::Timestamp) => true,
            _ => false,
        }
    }

    /// Short name of the value kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Int(_) => "integer",
            Cell::Float(_) => "float",
            Cell::Text(_) => "text",
            Cell::Bool(_) => "boolean",
            Cell::Date(_) => "date",
            Cell::Timestamp(_) => "timestamp",
        }
    }
}

impl fmt::Display for Cell {
    /// Formats the value as written to CSV; nulls render empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}
