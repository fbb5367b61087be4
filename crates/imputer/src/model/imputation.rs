//! Fitted imputation model.

use tracing::info;

use crate::error::{ImputerError, Result};
use crate::frame::Dataset;
use crate::schema::{Schema, project_schema};

use super::mapping::ColumnMapping;
use super::value::{ReplacementValue, ReplacementValues};

/// Immutable result of fitting an [`Imputer`](crate::Imputer).
///
/// Holds one replacement value per output column plus the column mapping.
/// Safe to share across threads for concurrent `transform` calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputationModel {
    uid: String,
    replacement_values: ReplacementValues,
    mapping: ColumnMapping,
}

impl ImputationModel {
    /// Build a model, checking that the replacement values cover exactly the
    /// output columns and that every double is finite.
    pub fn new(
        uid: impl Into<String>,
        replacement_values: ReplacementValues,
        mapping: ColumnMapping,
    ) -> Result<Self> {
        if let Some(missing) = mapping
            .output_cols()
            .iter()
            .find(|c| !replacement_values.contains_key(c.as_str()))
        {
            return Err(ImputerError::Config(format!(
                "no replacement value for output column '{}'",
                missing
            )));
        }
        if replacement_values.len() != mapping.len() {
            let extra: Vec<&str> = replacement_values
                .keys()
                .filter(|k| !mapping.output_cols().contains(*k))
                .map(String::as_str)
                .collect();
            return Err(ImputerError::Config(format!(
                "replacement values for unknown output columns: {:?}",
                extra
            )));
        }

        if let Some((column, value)) = replacement_values
            .iter()
            .find(|(_, v)| v.as_f64().is_some_and(|x| !x.is_finite()))
        {
            return Err(ImputerError::Config(format!(
                "replacement value {} for column '{}' is not finite",
                value, column
            )));
        }

        Ok(Self {
            uid: uid.into(),
            replacement_values,
            mapping,
        })
    }

    /// Model identity, inherited from the estimator that produced it.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Replacement values keyed by output column.
    pub fn replacement_values(&self) -> &ReplacementValues {
        &self.replacement_values
    }

    /// Column mapping.
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn input_cols(&self) -> &[String] {
        self.mapping.input_cols()
    }

    pub fn output_cols(&self) -> &[String] {
        self.mapping.output_cols()
    }

    /// Replacement value for one output column.
    pub fn surrogate(&self, output_col: &str) -> Option<&ReplacementValue> {
        self.replacement_values.get(output_col)
    }

    /// `(output column, value)` in output column order.
    pub fn surrogates(&self) -> impl Iterator<Item = (&str, &ReplacementValue)> {
        self.mapping
            .output_cols()
            .iter()
            .filter_map(|c| self.replacement_values.get(c).map(|v| (c.as_str(), v)))
    }

    /// Independent copy with the same identity and contents.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Schema that [`transform`](Self::transform) would produce.
    ///
    /// Integral output columns filled with a double become double columns.
    pub fn transform_schema(&self, schema: &Schema) -> Result<Schema> {
        let mut projected =
            project_schema(schema, self.mapping.input_cols(), self.mapping.output_cols())?;
        for field in projected.fields.iter_mut() {
            if let Some(value) = self.replacement_values.get(&field.name) {
                field.data_type = value.output_type(field.data_type);
            }
        }
        Ok(projected)
    }

    /// Alias every renamed input onto its output column, then fill missing
    /// cells of each output column with its replacement value.
    ///
    /// Row count and order are preserved and columns outside the mapping pass
    /// through untouched. An output name that already exists is overwritten.
    pub fn transform<D: Dataset>(&self, dataset: &D) -> Result<D> {
        let schema = dataset.schema();
        if let Some(missing) = self.input_cols().iter().find(|c| !schema.contains(c)) {
            return Err(ImputerError::ColumnNotFound(missing.clone()));
        }

        let projected = dataset.project_columns(&self.mapping.aliases())?;
        let filled = projected.fill_nulls(&self.replacement_values)?;

        info!(
            uid = %self.uid,
            columns = self.mapping.len(),
            "applied imputation model"
        );
        Ok(filled)
    }
}
