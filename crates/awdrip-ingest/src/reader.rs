//! Delimited source file reading.
//!
//! The first line is the header. Every following line becomes one
//! [`SourceRow`]; rows that cannot be turned into a record are yielded as
//! [`RowError`]s so callers can skip them and keep going.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use awdrip_model::InputRecord;
use csv::{ReaderBuilder, StringRecordsIntoIter};
use tracing::debug;

use crate::error::{IngestError, Result, RowError};

/// Parsing options for source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    pub delimiter: u8,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl ReaderOptions {
    /// Options for a single-character delimiter.
    pub fn with_delimiter(delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
            return Err(IngestError::InvalidDelimiter { delimiter });
        }
        Ok(Self {
            delimiter: delimiter as u8,
        })
    }
}

/// A parsed data row and its 1-based position in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub number: usize,
    pub record: InputRecord,
}

/// Streaming reader over the data rows of one delimited file.
///
/// The sequence is finite and not restartable; reopen the file to read it
/// again.
pub struct DelimitedRecordReader<R = File> {
    path: PathBuf,
    headers: Arc<[String]>,
    records: StringRecordsIntoIter<R>,
    row: usize,
    finished: bool,
}

impl DelimitedRecordReader<File> {
    /// Open `path` and read its header line.
    pub fn open(path: &Path, options: ReaderOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| IngestError::file(path, e))?;
        Self::from_reader(file, path, options)
    }
}

impl<R: Read> DelimitedRecordReader<R> {
    /// Wrap an arbitrary reader. `path` is only used in error messages.
    pub fn from_reader(reader: R, path: impl Into<PathBuf>, options: ReaderOptions) -> Result<Self> {
        let path = path.into();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(options.delimiter)
            .from_reader(reader);
        let headers: Arc<[String]> = reader
            .headers()
            .map_err(|source| IngestError::Header {
                path: path.clone(),
                source,
            })?
            .iter()
            .map(normalize_header)
            .collect();
        // a file without a header line has no rows either
        let finished = headers.is_empty();
        debug!(path = %path.display(), columns = headers.len(), "source header read");
        Ok(Self {
            path,
            headers,
            records: reader.into_records(),
            row: 0,
            finished,
        })
    }

    /// False for an empty file, which yields no rows.
    pub fn has_header(&self) -> bool {
        !self.headers.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fail if any of `columns` is missing from the header.
    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        for column in columns {
            if !self.headers.iter().any(|name| name == column) {
                return Err(IngestError::MissingColumn {
                    column: (*column).to_string(),
                    path: self.path.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<R: Read> Iterator for DelimitedRecordReader<R> {
    type Item = std::result::Result<SourceRow, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.records.next()?;
        self.row += 1;
        let row = self.row;

        let record = match result {
            Ok(record) => record,
            Err(error) => {
                let message = error.to_string();
                let row_error = match error.into_kind() {
                    csv::ErrorKind::Io(source) => {
                        self.finished = true;
                        RowError::Io { row, source }
                    }
                    _ => RowError::Malformed { row, message },
                };
                return Some(Err(row_error));
            }
        };

        if record.len() < self.headers.len() {
            return Some(Err(RowError::ShortRow {
                row,
                expected: self.headers.len(),
                found: record.len(),
            }));
        }

        let values = record.iter().map(str::to_string).collect();
        Some(Ok(SourceRow {
            number: row,
            record: InputRecord::new(Arc::clone(&self.headers), values),
        }))
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}
