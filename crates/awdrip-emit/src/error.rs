//! Error types for resolution and emission.

use std::path::PathBuf;
use thiserror::Error;

/// A field of an accepted record could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The source column mapped to a field is not in the record.
    #[error("field {field}: column '{column}' not found in record")]
    MissingColumn { field: String, column: String },

    /// UNIT has no catalog destination and no fallback column.
    #[error("field {field}: no destination for system id '{system_id}' and no fallback column")]
    NoUnitSource { field: String, system_id: String },

    /// WRKT/STAT lookup found no status row for the system id.
    #[error("field {field}: no status entry for system id '{system_id}'")]
    MissingStatus { field: String, system_id: String },
}

/// Unit of work a failure abandons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// Skip the row and continue with the next one.
    Row,
    /// Abandon the rest of the source file.
    File,
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to write staging document {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to publish {staging} to {output}: {source}")]
    Publish {
        staging: PathBuf,
        output: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EmitError {
    pub fn scope(&self) -> ErrorScope {
        match self {
            Self::Resolve(_) => ErrorScope::Row,
            Self::Stage { .. } | Self::Publish { .. } => ErrorScope::File,
        }
    }
}
