//! Typed replacement values and their fill-time conversion.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ImputerError, Result};
use crate::frame::Cell;
use crate::schema::DataType;

/// Replacement value for one output column, keyed by output column name.
pub type ReplacementValues = IndexMap<String, ReplacementValue>;

/// A replacement value tagged with its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ReplacementValue {
    /// Numeric surrogate. Statistics are always normalized to double.
    Double(f64),
    /// Custom literal for integer and long columns.
    Integer(i64),
    /// Literal for string columns.
    Text(String),
    /// Literal for boolean columns.
    Boolean(bool),
}

impl ReplacementValue {
    /// Interpret a custom literal for a column of the given type.
    ///
    /// Float and double columns parse the literal as a finite number; integer
    /// and long columns parse it as a whole number in range. Boolean columns
    /// accept `true`/`false` in any case. String columns take the literal
    /// verbatim. Temporal columns are rejected.
    pub fn from_literal(literal: &str, column: &str, data_type: DataType) -> Result<Self> {
        let invalid = |expected: &str| {
            ImputerError::Config(format!(
                "custom value '{}' is not a valid {} for column '{}' ({})",
                literal, expected, column, data_type
            ))
        };

        match data_type {
            DataType::Integer => {
                let value: i32 = literal.trim().parse().map_err(|_| invalid("32-bit integer"))?;
                Ok(ReplacementValue::Integer(i64::from(value)))
            }
            DataType::Long => {
                let value: i64 = literal.trim().parse().map_err(|_| invalid("64-bit integer"))?;
                Ok(ReplacementValue::Integer(value))
            }
            DataType::Float | DataType::Double => {
                let value: f64 = literal.trim().parse().map_err(|_| invalid("number"))?;
                if !value.is_finite() {
                    return Err(invalid("finite number"));
                }
                Ok(ReplacementValue::Double(value))
            }
            DataType::Boolean => match literal.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(ReplacementValue::Boolean(true)),
                "false" => Ok(ReplacementValue::Boolean(false)),
                _ => Err(invalid("boolean")),
            },
            DataType::String => Ok(ReplacementValue::Text(literal.to_string())),
            DataType::Date | DataType::Timestamp => Err(ImputerError::UnsupportedType {
                column: column.to_string(),
                data_type,
                mode: crate::stats::CleaningMode::Custom,
            }),
        }
    }

    /// Short name of the value kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ReplacementValue::Double(_) => "double",
            ReplacementValue::Integer(_) => "integer",
            ReplacementValue::Text(_) => "text",
            ReplacementValue::Boolean(_) => "boolean",
        }
    }

    /// Numeric value, if this is a double or an integer.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ReplacementValue::Double(v) => Some(*v),
            ReplacementValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Type of a column of `data_type` once this value has been filled in.
    ///
    /// A double filled into an integer or long column widens it to double;
    /// every other combination keeps the column type.
    pub fn output_type(&self, data_type: DataType) -> DataType {
        match self {
            ReplacementValue::Double(_) if data_type.is_integral() => DataType::Double,
            _ => data_type,
        }
    }

    /// Convert to a cell for a column of the given type.
    ///
    /// Doubles into float columns round to single precision. Integral
    /// columns only take integers; widen them with
    /// [`output_type`](Self::output_type) before filling with a double.
    pub fn to_cell(&self, column: &str, data_type: DataType) -> Result<Cell> {
        let cell = match (self, data_type) {
            (ReplacementValue::Double(v), DataType::Float) => Cell::Float(f64::from(*v as f32)),
            (ReplacementValue::Double(v), DataType::Double) => Cell::Float(*v),
            (ReplacementValue::Integer(v), DataType::Integer) if i32::try_from(*v).is_ok() => {
                Cell::Int(*v)
            }
            (ReplacementValue::Integer(v), DataType::Long) => Cell::Int(*v),
            (ReplacementValue::Integer(v), DataType::Float | DataType::Double) => {
                Cell::Float(*v as f64)
            }
            (ReplacementValue::Text(s), DataType::String) => Cell::Text(s.clone()),
            (ReplacementValue::Boolean(b), DataType::Boolean) => Cell::Bool(*b),
            _ => {
                return Err(ImputerError::TypeMismatch {
                    column: column.to_string(),
                    expected: data_type,
                    found: self.kind(),
                });
            }
        };
        Ok(cell)
    }
}

impl fmt::Display for ReplacementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementValue::Double(v) => write!(f, "{}", v),
            ReplacementValue::Integer(v) => write!(f, "{}", v),
            ReplacementValue::Text(s) => write!(f, "'{}'", s),
            ReplacementValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}
