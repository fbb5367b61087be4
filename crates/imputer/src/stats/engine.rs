//! Per-column replacement value computation.

use tracing::debug;

use crate::error::{ImputerError, Result};
use crate::frame::Dataset;
use crate::model::ReplacementValue;
use crate::schema::{DataType, Schema};

use super::mode::CleaningMode;

/// Default relative error for the approximate median.
pub const DEFAULT_RELATIVE_ERROR: f64 = 0.001;

/// Computes one replacement value per input column for a cleaning mode.
#[derive(Debug, Clone, Copy)]
pub struct ColumnStatEngine {
    relative_error: f64,
}

impl ColumnStatEngine {
    /// Create an engine with the given median relative error.
    pub fn new(relative_error: f64) -> Self {
        Self { relative_error }
    }

    pub fn relative_error(&self) -> f64 {
        self.relative_error
    }

    /// Resolve and type-check every column for the mode.
    ///
    /// All columns are checked before any statistic runs; the first unknown
    /// column or unsupported type fails the whole call.
    pub fn validate(
        &self,
        schema: &Schema,
        columns: &[String],
        mode: CleaningMode,
    ) -> Result<Vec<DataType>> {
        let types = columns
            .iter()
            .map(|name| {
                schema
                    .field(name)
                    .map(|f| f.data_type)
                    .ok_or_else(|| ImputerError::ColumnNotFound(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some((column, data_type)) = columns
            .iter()
            .zip(&types)
            .find(|(_, data_type)| !mode.supports(**data_type))
        {
            return Err(ImputerError::UnsupportedType {
                column: column.clone(),
                data_type: *data_type,
                mode,
            });
        }

        Ok(types)
    }

    /// Compute replacement values for `columns`, in order.
    ///
    /// Mean and median issue exactly one aggregation call over the dataset.
    /// Custom mode reads no data: the literal is typed per column.
    pub fn compute<D: Dataset>(
        &self,
        dataset: &D,
        columns: &[String],
        mode: CleaningMode,
        custom_value: Option<&str>,
    ) -> Result<Vec<ReplacementValue>> {
        let types = self.validate(dataset.schema(), columns, mode)?;
        let names: Vec<&str> = columns.iter().map(String::as_str).collect();

        match mode {
            CleaningMode::Mean => surrogates(columns, dataset.mean(&names)?),
            CleaningMode::Median => surrogates(
                columns,
                dataset.approx_quantile(&names, 0.5, self.relative_error)?,
            ),
            CleaningMode::Custom => {
                let literal = custom_value.ok_or_else(|| {
                    ImputerError::Config("custom mode requires a custom value".to_string())
                })?;
                columns
                    .iter()
                    .zip(types)
                    .map(|(column, data_type)| {
                        ReplacementValue::from_literal(literal, column, data_type)
                    })
                    .collect()
            }
        }
    }
}

impl Default for ColumnStatEngine {
    fn default() -> Self {
        Self::new(DEFAULT_RELATIVE_ERROR)
    }
}

/// Pair aggregation results with their columns; an empty column has no
/// surrogate and a non-finite one cannot be persisted.
fn surrogates(columns: &[String], values: Vec<Option<f64>>) -> Result<Vec<ReplacementValue>> {
    columns
        .iter()
        .zip(values)
        .map(|(column, value)| {
            let value = value.ok_or_else(|| ImputerError::NoObservedValues {
                column: column.clone(),
            })?;
            if !value.is_finite() {
                return Err(ImputerError::NonFiniteSurrogate {
                    column: column.clone(),
                    value,
                });
            }
            debug!(column = %column, value, "computed surrogate");
            Ok(ReplacementValue::Double(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Column, Frame};

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn frame() -> Frame {
        Frame::new(vec![
            Column::integer("age", vec![Some(1), Some(2), None, Some(4)]),
            Column::double("score", vec![Some(0.5), None, Some(1.5), Some(2.5)]),
            Column::string("name", vec![Some("a"), None, Some("b"), None]),
            Column::boolean("flag", vec![None, Some(true), Some(false), None]),
            Column::double("empty", vec![None, None, None, None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_mean_values() {
        let values = ColumnStatEngine::default()
            .compute(&frame(), &cols(&["age", "score"]), CleaningMode::Mean, None)
            .unwrap();

        assert!((values[0].as_f64().unwrap() - 7.0 / 3.0).abs() < 1e-12);
        assert!((values[1].as_f64().unwrap() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_median_values() {
        let values = ColumnStatEngine::default()
            .compute(&frame(), &cols(&["age", "score"]), CleaningMode::Median, None)
            .unwrap();

        assert!((values[0].as_f64().unwrap() - 2.0).abs() < 1e-9);
        assert!((values[1].as_f64().unwrap() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_mean_rejects_any_non_numeric_column() {
        let err = ColumnStatEngine::default()
            .compute(&frame(), &cols(&["age", "name"]), CleaningMode::Mean, None)
            .unwrap_err();
        assert!(matches!(
            err,
            ImputerError::UnsupportedType { ref column, data_type: DataType::String, mode: CleaningMode::Mean }
                if column == "name"
        ));
    }

    #[test]
    fn test_unknown_column_reported_before_types() {
        let err = ColumnStatEngine::default()
            .compute(&frame(), &cols(&["name", "height"]), CleaningMode::Median, None)
            .unwrap_err();
        assert!(matches!(err, ImputerError::ColumnNotFound(ref c) if c == "height"));
    }

    #[test]
    fn test_custom_values_are_typed_per_column() {
        let values = ColumnStatEngine::default()
            .compute(&frame(), &cols(&["age", "name"]), CleaningMode::Custom, Some("0"))
            .unwrap();

        assert_eq!(values[0], ReplacementValue::Integer(0));
        assert_eq!(values[1], ReplacementValue::Text("0".to_string()));
    }

    #[test]
    fn test_custom_unparseable_literal() {
        let err = ColumnStatEngine::default()
            .compute(&frame(), &cols(&["name", "flag"]), CleaningMode::Custom, Some("unknown"))
            .unwrap_err();
        assert!(matches!(err, ImputerError::Config(_)));
    }

    #[test]
    fn test_custom_requires_value() {
        let err = ColumnStatEngine::default()
            .compute(&frame(), &cols(&["name"]), CleaningMode::Custom, None)
            .unwrap_err();
        assert!(matches!(err, ImputerError::Config(_)));
    }

    #[test]
    fn test_all_null_column_has_no_surrogate() {
        let err = ColumnStatEngine::default()
            .compute(&frame(), &cols(&["score", "empty"]), CleaningMode::Mean, None)
            .unwrap_err();
        assert!(matches!(err, ImputerError::NoObservedValues { ref column } if column == "empty"));
    }

    #[test]
    fn test_overflowing_mean_is_rejected() {
        let frame = Frame::new(vec![Column::double("x", vec![Some(f64::MAX), Some(f64::MAX), None])]).unwrap();
        let err = ColumnStatEngine::default()
            .compute(&frame, &cols(&["x"]), CleaningMode::Mean, None)
            .unwrap_err();
        assert!(matches!(
            err,
            ImputerError::NonFiniteSurrogate { ref column, value } if column == "x" && value.is_infinite()
        ));
    }

    #[test]
    fn test_infinite_observations_are_rejected() {
        let frame = Frame::new(vec![Column::double("x", vec![Some(f64::INFINITY), Some(1.0), None])]).unwrap();
        let err = ColumnStatEngine::default()
            .compute(&frame, &cols(&["x"]), CleaningMode::Mean, None)
            .unwrap_err();
        assert!(matches!(err, ImputerError::NonFiniteSurrogate { .. }));
    }
}
