//! Core type definitions for schema representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// 32-bit signed integers.
    Integer,
    /// 64-bit signed integers.
    Long,
    /// Single-precision floating point.
    Float,
    /// Double-precision floating point.
    Double,
    /// Text/string values.
    String,
    /// Boolean values (true/false).
    Boolean,
    /// Date only (no time component).
    Date,
    /// Date and time without a zone.
    Timestamp,
}

impl DataType {
    /// Returns true if this type is in the integer/long/float/double family.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Integer | DataType::Long | DataType::Float | DataType::Double
        )
    }

    /// Returns true if this type is integral.
    pub fn is_integral(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Long)
    }

    /// Returns true if this type is temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Date | DataType::Timestamp)
    }

    /// Lowercase name, as used in error messages and CSV overrides.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(DataType::Integer),
            "long" | "bigint" => Ok(DataType::Long),
            "float" => Ok(DataType::Float),
            "double" => Ok(DataType::Double),
            "string" | "text" => Ok(DataType::String),
            "boolean" | "bool" => Ok(DataType::Boolean),
            "date" => Ok(DataType::Date),
            "timestamp" | "datetime" => Ok(DataType::Timestamp),
            other => Err(format!("unknown data type '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_family() {
        assert!(DataType::Integer.is_numeric());
        assert!(DataType::Long.is_numeric());
        assert!(DataType::Float.is_numeric());
        assert!(DataType::Double.is_numeric());
        assert!(!DataType::String.is_numeric());
        assert!(!DataType::Boolean.is_numeric());
        assert!(!DataType::Date.is_numeric());
    }

    #[test]
    fn test_parse_type_names() {
        assert_eq!("Double".parse::<DataType>().unwrap(), DataType::Double);
        assert_eq!("bigint".parse::<DataType>().unwrap(), DataType::Long);
        assert!("decimal".parse::<DataType>().is_err());
    }
}
