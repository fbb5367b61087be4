//! The `Imputer` estimator and its parameters.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ImputerError, Result};
use crate::frame::Dataset;
use crate::model::{ColumnMapping, ImputationModel, ReplacementValues};
use crate::schema::{Schema, project_schema};
use crate::stats::{CleaningMode, ColumnStatEngine, DEFAULT_RELATIVE_ERROR};

/// Configuration for an [`Imputer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImputerParams {
    /// Columns to read replacement statistics from.
    pub input_cols: Vec<String>,
    /// Columns that receive the imputed copy, parallel to `input_cols`.
    pub output_cols: Vec<String>,
    /// How the replacement value is derived.
    #[serde(default)]
    pub mode: CleaningMode,
    /// Literal used by [`CleaningMode::Custom`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_value: Option<String>,
    /// Relative error of the approximate median, in (0, 1].
    #[serde(default = "default_relative_error")]
    pub relative_error: f64,
}

fn default_relative_error() -> f64 {
    DEFAULT_RELATIVE_ERROR
}

impl Default for ImputerParams {
    fn default() -> Self {
        Self {
            input_cols: Vec::new(),
            output_cols: Vec::new(),
            mode: CleaningMode::default(),
            custom_value: None,
            relative_error: DEFAULT_RELATIVE_ERROR,
        }
    }
}

impl ImputerParams {
    /// Create params that clean `columns` in place.
    pub fn in_place<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cols: Vec<String> = columns.into_iter().map(Into::into).collect();
        Self {
            output_cols: cols.clone(),
            input_cols: cols,
            ..Self::default()
        }
    }

    /// Set the input columns.
    pub fn with_input_cols<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_cols = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the output columns, parallel to the input columns.
    pub fn with_output_cols<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_cols = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the cleaning mode.
    pub fn with_mode(mut self, mode: CleaningMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the literal used by custom mode.
    pub fn with_custom_value(mut self, value: impl Into<String>) -> Self {
        self.custom_value = Some(value.into());
        self
    }

    /// Set the relative error of the approximate median.
    pub fn with_relative_error(mut self, relative_error: f64) -> Self {
        self.relative_error = relative_error;
        self
    }

    /// Check everything that can be checked without a schema.
    pub fn validate(&self) -> Result<ColumnMapping> {
        let mapping = ColumnMapping::new(self.input_cols.clone(), self.output_cols.clone())?;

        if !(self.relative_error > 0.0 && self.relative_error <= 1.0) {
            return Err(ImputerError::Config(format!(
                "relativeError must be in (0, 1], got {}",
                self.relative_error
            )));
        }
        if self.mode == CleaningMode::Custom && self.custom_value.is_none() {
            return Err(ImputerError::Config(
                "custom mode requires a custom value".to_string(),
            ));
        }

        Ok(mapping)
    }
}

/// Estimator that learns one replacement value per column.
///
/// # Example
///
/// ```
/// use imputer::{CleaningMode, Column, Frame, Imputer, ImputerParams};
///
/// let frame = Frame::new(vec![Column::integer("age", vec![Some(1), Some(2), None, Some(4)])])?;
/// let imputer = Imputer::new(ImputerParams::in_place(["age"]).with_mode(CleaningMode::Mean));
///
/// let model = imputer.fit(&frame)?;
/// let cleaned = model.transform(&frame)?;
/// assert_eq!(cleaned.null_count("age"), Some(0));
/// # Ok::<(), imputer::ImputerError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Imputer {
    uid: String,
    params: ImputerParams,
}

impl Imputer {
    /// Create an estimator with a fresh random uid.
    pub fn new(params: ImputerParams) -> Self {
        Self {
            uid: generate_uid(),
            params,
        }
    }

    /// Replace the generated uid.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Estimator identity, inherited by fitted models.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Configured parameters.
    pub fn params(&self) -> &ImputerParams {
        &self.params
    }

    /// Compute replacement values from `dataset` and build a model.
    ///
    /// Configuration, column existence and type rules are all checked before
    /// any aggregation runs. Mean and median issue a single aggregation call
    /// covering every input column. The dataset is not modified.
    pub fn fit<D: Dataset>(&self, dataset: &D) -> Result<ImputationModel> {
        let mapping = self.params.validate()?;
        let engine = ColumnStatEngine::new(self.params.relative_error);

        debug!(
            uid = %self.uid,
            mode = %self.params.mode,
            columns = ?self.params.input_cols,
            "fitting imputer"
        );

        let values = engine.compute(
            dataset,
            mapping.input_cols(),
            self.params.mode,
            self.params.custom_value.as_deref(),
        )?;

        let replacement_values: ReplacementValues = mapping
            .output_cols()
            .iter()
            .cloned()
            .zip(values)
            .collect();

        let model = ImputationModel::new(self.uid.clone(), replacement_values, mapping)?;
        info!(
            uid = %self.uid,
            mode = %self.params.mode,
            columns = model.mapping().len(),
            "fitted imputation model"
        );
        Ok(model)
    }

    /// Fit on `dataset` and transform the same dataset.
    pub fn fit_transform<D: Dataset>(&self, dataset: &D) -> Result<(ImputationModel, D)> {
        let model = self.fit(dataset)?;
        let transformed = model.transform(dataset)?;
        Ok((model, transformed))
    }

    /// Output schema of a model this estimator would fit on `schema`.
    ///
    /// Mean and median widen integral output columns to double.
    pub fn transform_schema(&self, schema: &Schema) -> Result<Schema> {
        let mapping = self.params.validate()?;
        ColumnStatEngine::new(self.params.relative_error).validate(
            schema,
            mapping.input_cols(),
            self.params.mode,
        )?;

        let mut projected = project_schema(schema, mapping.input_cols(), mapping.output_cols())?;
        for output in mapping.output_cols() {
            if let Some(idx) = projected.index_of(output) {
                let field = &mut projected.fields[idx];
                field.data_type = self.params.mode.output_type(field.data_type);
            }
        }
        Ok(projected)
    }
}

/// Random identity in the form `imputer_<12 hex digits>`.
fn generate_uid() -> String {
    format!("imputer_{:012x}", fastrand::u64(..) & 0xffff_ffff_ffff)
}
