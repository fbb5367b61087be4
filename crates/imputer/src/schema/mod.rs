//! Schema types: declared column types, fields, and output projection.

mod field;
mod projection;
mod table;
mod types;

pub use field::Field;
pub use projection::project_schema;
pub use table::Schema;
pub use types::DataType;
