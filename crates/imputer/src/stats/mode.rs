//! Cleaning modes and their column-type rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ImputerError;
use crate::schema::DataType;

/// How the replacement value for each column is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleaningMode {
    /// Exact arithmetic mean of the non-missing values.
    #[default]
    Mean,
    /// Approximate median from a quantile sketch.
    Median,
    /// A fixed user-supplied literal.
    Custom,
}

impl CleaningMode {
    /// Returns true if a column of this type may be cleaned with this mode.
    pub fn supports(&self, data_type: DataType) -> bool {
        match self {
            CleaningMode::Mean | CleaningMode::Median => data_type.is_numeric(),
            CleaningMode::Custom => !data_type.is_temporal(),
        }
    }

    /// Type of the output column filled from an input of `data_type`.
    ///
    /// Mean and median fill doubles, so integral inputs widen to double.
    pub fn output_type(&self, data_type: DataType) -> DataType {
        match self {
            CleaningMode::Mean | CleaningMode::Median if data_type.is_integral() => DataType::Double,
            _ => data_type,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CleaningMode::Mean => "mean",
            CleaningMode::Median => "median",
            CleaningMode::Custom => "custom",
        }
    }
}

impl fmt::Display for CleaningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleaningMode {
    type Err = ImputerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(CleaningMode::Mean),
            "median" => Ok(CleaningMode::Median),
            "custom" => Ok(CleaningMode::Custom),
            other => Err(ImputerError::Config(format!(
                "unsupported cleaning mode '{}' (expected mean, median, or custom)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("Mean".parse::<CleaningMode>().unwrap(), CleaningMode::Mean);
        assert_eq!(" median ".parse::<CleaningMode>().unwrap(), CleaningMode::Median);
        assert_eq!("CUSTOM".parse::<CleaningMode>().unwrap(), CleaningMode::Custom);
        assert!(matches!(
            "mode".parse::<CleaningMode>(),
            Err(ImputerError::Config(_))
        ));
    }

    #[test]
    fn test_type_rules() {
        assert!(CleaningMode::Mean.supports(DataType::Integer));
        assert!(!CleaningMode::Median.supports(DataType::String));
        assert!(CleaningMode::Custom.supports(DataType::Boolean));
        assert!(CleaningMode::Custom.supports(DataType::String));
        assert!(!CleaningMode::Custom.supports(DataType::Timestamp));
    }

    #[test]
    fn test_output_types() {
        assert_eq!(CleaningMode::Mean.output_type(DataType::Integer), DataType::Double);
        assert_eq!(CleaningMode::Median.output_type(DataType::Long), DataType::Double);
        assert_eq!(CleaningMode::Median.output_type(DataType::Float), DataType::Float);
        assert_eq!(CleaningMode::Custom.output_type(DataType::Integer), DataType::Integer);
    }
}
