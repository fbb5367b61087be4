//! Replacement value statistics: cleaning modes and the column engine.

mod engine;
mod mode;

pub use engine::{ColumnStatEngine, DEFAULT_RELATIVE_ERROR};
pub use mode::CleaningMode;
