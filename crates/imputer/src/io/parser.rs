//! CSV/TSV parser with delimiter detection and type inference.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ImputerError, Result};
use crate::frame::{Cell, Column, Frame};
use crate::schema::{DataType, Field};

use super::infer::{infer_type, is_null_value, parse_cell};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Declared types that bypass inference, by column name.
    pub column_types: IndexMap<String, DataType>,
    /// Extra tokens read as null, compared exactly after trimming.
    pub null_values: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            column_types: IndexMap::new(),
            null_values: Vec::new(),
        }
    }
}

impl ParserConfig {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_column_type(mut self, column: impl Into<String>, data_type: DataType) -> Self {
        self.column_types.insert(column.into(), data_type);
        self
    }

    pub fn with_null_value(mut self, token: impl Into<String>) -> Self {
        self.null_values.push(token.into());
        self
    }

    fn is_null(&self, value: &str) -> bool {
        is_null_value(value) || self.null_values.iter().any(|t| t == value.trim())
    }
}

/// Parses delimited text into a [`Frame`].
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file into a frame.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Frame> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| ImputerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let frame = self.parse_bytes(&contents)?;
        debug!(
            path = %path.display(),
            rows = frame.row_count(),
            columns = frame.column_count(),
            "parsed input file"
        );
        Ok(frame)
    }

    /// Parse in-memory bytes into a frame.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Frame> {
        let delimiter = match self.config.delimiter {
            Some(d) if d == self.config.quote || d == b'\n' || d == b'\r' => {
                return Err(ImputerError::InvalidDelimiter(format!(
                    "{:?} cannot be used as a field delimiter",
                    d as char
                )));
            }
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        let (headers, rows) = self.read_records(bytes, delimiter)?;
        self.build_frame(headers, rows)
    }

    /// Read headers and padded string rows.
    fn read_records(&self, bytes: &[u8], delimiter: u8) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        }

        let headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.to_string()).collect()
        } else {
            // Generate column names
            let width = rows.first().map(Vec::len).unwrap_or(0);
            (0..width).map(|i| format!("column_{}", i + 1)).collect()
        };

        if headers.is_empty() {
            return Err(ImputerError::EmptyData("No columns found".to_string()));
        }
        if rows.is_empty() {
            return Err(ImputerError::EmptyData("No data rows found".to_string()));
        }

        let expected_cols = headers.len();
        for row in &mut rows {
            row.resize(expected_cols, String::new());
        }
        Ok((headers, rows))
    }

    fn build_frame(&self, headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Frame> {
        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(col_idx, name)| {
                let raw: Vec<&str> = rows.iter().map(|row| row[col_idx].as_str()).collect();
                let data_type = match self.config.column_types.get(&name) {
                    Some(declared) => *declared,
                    None => infer_type(raw.iter().copied().filter(|v| !self.config.is_null(v))),
                };

                let cells = raw
                    .iter()
                    .enumerate()
                    .map(|(row_idx, value)| {
                        if self.config.is_null(value) {
                            Ok(Cell::Null)
                        } else {
                            parse_cell(value, data_type, row_idx + 1, col_idx + 1)
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(Column::new(Field::new(name, data_type), cells))
            })
            .collect::<Result<Vec<_>>>()?;

        Frame::new(columns)
    }
}

/// Detect the delimiter by analyzing the first few lines.
pub fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ImputerError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance =
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64;

        // Consistent counts win; tab breaks ties.
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Dataset;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_ignores_quoted_delimiters() {
        let data = b"name;note\n\"a;b\";x\nc;y";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_typed_frame() {
        let data = b"name,age,score,active\nAlice,30,1.5,true\nBob,NA,,false\n,25,2.5,";
        let frame = Parser::new().parse_bytes(data).unwrap();

        let types: Vec<DataType> = frame.schema().fields.iter().map(|f| f.data_type).collect();
        assert_eq!(
            types,
            vec![DataType::String, DataType::Integer, DataType::Double, DataType::Boolean]
        );
        assert_eq!(frame.row_count(), 3);
        assert_eq!(frame.get(1, "age"), Some(&Cell::Null));
        assert_eq!(frame.get(2, "name"), Some(&Cell::Null));
        assert_eq!(frame.get(0, "score"), Some(&Cell::Float(1.5)));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let data = b"a,b\n1,2\n3";
        let frame = Parser::new().parse_bytes(data).unwrap();
        assert_eq!(frame.get(1, "b"), Some(&Cell::Null));
    }

    #[test]
    fn test_column_type_override_and_null_tokens() {
        let config = ParserConfig::default()
            .with_column_type("id", DataType::Long)
            .with_null_value("?");
        let data = b"id,x\n1,?\n2,3.5";
        let frame = Parser::with_config(config).parse_bytes(data).unwrap();

        assert_eq!(frame.schema().field("id").unwrap().data_type, DataType::Long);
        assert_eq!(frame.schema().field("x").unwrap().data_type, DataType::Double);
        assert_eq!(frame.get(0, "x"), Some(&Cell::Null));
    }

    #[test]
    fn test_override_parse_failure() {
        let config = ParserConfig::default().with_column_type("x", DataType::Integer);
        let err = Parser::with_config(config)
            .parse_bytes(b"x\n1\nabc")
            .unwrap_err();
        assert!(matches!(err, ImputerError::Parse { row: 2, column: 1, .. }));
    }

    #[test]
    fn test_headerless_and_max_rows() {
        let config = ParserConfig {
            has_header: false,
            max_rows: Some(2),
            ..ParserConfig::default()
        };
        let frame = Parser::with_config(config).parse_bytes(b"1,a\n2,b\n3,c").unwrap();
        assert_eq!(frame.schema().field_names(), vec!["column_1", "column_2"]);
        assert_eq!(frame.row_count(), 2);
    }

    #[test]
    fn test_quote_as_delimiter_rejected() {
        let parser = Parser::with_config(ParserConfig::default().with_delimiter(b'"'));
        assert!(matches!(
            parser.parse_bytes(b"a\n1"),
            Err(ImputerError::InvalidDelimiter(_))
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(matches!(
            Parser::new().parse_bytes(b"a,b\n"),
            Err(ImputerError::EmptyData(_))
        ));
    }
}
