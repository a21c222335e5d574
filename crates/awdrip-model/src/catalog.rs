use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Destination value that marks a source-system id as not exportable.
pub const EXCLUDE_MARKER: &str = "Exclude";

/// Where rows of a source-system id are routed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    /// Rows are emitted with this unit code.
    Unit(String),
    /// Rows are never emitted.
    Excluded,
}

impl Destination {
    /// Interpret a raw reference-table value. Only the exact marker excludes.
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();
        if value == EXCLUDE_MARKER {
            Self::Excluded
        } else {
            Self::Unit(value.to_string())
        }
    }

    /// The value as it appears in the reference table and in emitted UNIT fields.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unit(unit) => unit,
            Self::Excluded => EXCLUDE_MARKER,
        }
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self, Self::Excluded)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work-type/status pair looked up for WRKT and STAT fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkStatus {
    pub work_type: String,
    pub status: String,
}

/// A configured directory scanned for source files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDirectory {
    pub id: String,
    pub path: PathBuf,
}

impl SourceDirectory {
    /// Name used in output and archive file names: the directory's last
    /// path component, or the id when the path has none.
    pub fn dir_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.id.clone())
    }
}
