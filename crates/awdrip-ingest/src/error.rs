//! Error types for source ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a whole directory or file from being read.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source directory does not exist.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read a source file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Delimited Format Errors ===
    /// The header line could not be parsed.
    #[error("failed to parse header of {path}: {source}")]
    Header {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A column required for processing is not in the header.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Delimiter must be a single ASCII character.
    #[error("invalid delimiter {delimiter:?}: must be a single ASCII character")]
    InvalidDelimiter { delimiter: char },
}

impl IngestError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileRead { path, source }
        }
    }
}

/// Errors confined to a single data row.
///
/// `Io` is the exception: the underlying stream failed and no further rows
/// can be read, so the reader stops after yielding it.
#[derive(Debug, Error)]
pub enum RowError {
    /// The row has fewer fields than the header.
    #[error("row {row}: expected {expected} fields, found {found}")]
    ShortRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The row could not be decoded.
    #[error("row {row}: {message}")]
    Malformed { row: usize, message: String },

    /// The file could not be read past this row.
    #[error("read failed at row {row}: {source}")]
    Io {
        row: usize,
        #[source]
        source: std::io::Error,
    },
}

impl RowError {
    /// 1-based data row number (the header is not counted).
    pub fn row(&self) -> usize {
        match self {
            Self::ShortRow { row, .. } | Self::Malformed { row, .. } | Self::Io { row, .. } => {
                *row
            }
        }
    }

    /// True when the rest of the file is unreadable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
