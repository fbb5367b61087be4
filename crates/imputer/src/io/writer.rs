//! Write frames back out as delimited text.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ImputerError, Result};
use crate::frame::{Dataset, Frame};

/// Write `frame` as delimited text with a header row. Nulls are empty fields.
pub fn write_csv<W: Write>(frame: &Frame, writer: W, delimiter: u8) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    out.write_record(frame.schema().field_names())?;

    let columns: Vec<_> = frame.columns().collect();
    for row in 0..frame.row_count() {
        out.write_record(columns.iter().map(|c| c.cells()[row].to_string()))?;
    }

    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `frame` to a file, creating or truncating it.
pub fn write_csv_file(frame: &Frame, path: impl AsRef<Path>, delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| ImputerError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_csv(frame, BufWriter::new(file), delimiter)
}

/// Render `frame` as comma-separated bytes.
pub fn to_csv_bytes(frame: &Frame) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(frame, &mut buf, b',')?;
    Ok(buf)
}
