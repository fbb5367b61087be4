//! Fitted model: replacement values, column mapping, and application.

mod imputation;
mod mapping;
mod value;

pub use imputation::ImputationModel;
pub use mapping::ColumnMapping;
pub use value::{ReplacementValue, ReplacementValues};
