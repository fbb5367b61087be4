//! Tabular dataset abstraction and its in-memory implementation.

mod aggregate;
mod cell;
mod column;
mod dataset;
mod frame;

pub use cell::Cell;
pub use column::Column;
pub use dataset::Dataset;
pub use frame::{DEFAULT_PARTITION_ROWS, Frame};
