//! Imputer: fill missing values in tabular data with learned or fixed replacements.
//!
//! An [`Imputer`] is configured with parallel input and output column lists
//! and a [`CleaningMode`]. Fitting it against a [`Dataset`] computes one
//! replacement value per column (mean, approximate median, or a custom
//! literal) and yields an immutable [`ImputationModel`] that can transform
//! any number of datasets and be persisted through a [`BlobStore`].
//!
//! # Example
//!
//! ```
//! use imputer::{CleaningMode, Column, Frame, Imputer, ImputerParams, MemoryBlobStore};
//!
//! let frame = Frame::new(vec![
//!     Column::integer("age", vec![Some(1), Some(2), None, Some(4)]),
//! ])?;
//!
//! let imputer = Imputer::new(
//!     ImputerParams::default()
//!         .with_input_cols(["age"])
//!         .with_output_cols(["age_clean"])
//!         .with_mode(CleaningMode::Median),
//! );
//! let model = imputer.fit(&frame)?;
//! let cleaned = model.transform(&frame)?;
//! assert_eq!(cleaned.null_count("age_clean"), Some(0));
//!
//! let store = MemoryBlobStore::new();
//! model.save(&store, "models/age", false)?;
//! assert_eq!(imputer::ImputationModel::load(&store, "models/age")?, model);
//! # Ok::<(), imputer::ImputerError>(())
//! ```

pub mod error;
pub mod frame;
pub mod io;
pub mod model;
pub mod persistence;
pub mod schema;
pub mod stats;

mod imputer;

pub use crate::imputer::{Imputer, ImputerParams};
pub use error::{ImputerError, Result};
pub use frame::{Cell, Column, Dataset, Frame};
pub use io::{Parser, ParserConfig, write_csv, write_csv_file};
pub use model::{ColumnMapping, ImputationModel, ReplacementValue, ReplacementValues};
pub use persistence::{BlobStore, FsBlobStore, MemoryBlobStore};
pub use schema::{DataType, Field, Schema, project_schema};
pub use stats::{CleaningMode, ColumnStatEngine};
