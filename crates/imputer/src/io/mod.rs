//! Delimited text input and output for frames.

mod infer;
mod parser;
mod writer;

pub use infer::{infer_type, is_null_value};
pub use parser::{Parser, ParserConfig, detect_delimiter};
pub use writer::{to_csv_bytes, write_csv, write_csv_file};
