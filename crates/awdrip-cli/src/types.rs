use std::path::PathBuf;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};

use awdrip_model::FileTally;

/// Result of one batch over every configured source directory.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub started_at: NaiveDateTime,
    /// Date used for the dated staging and archive folders.
    pub date: NaiveDate,
    pub files: Vec<FileReport>,
    pub skipped: Vec<SkippedDirectory>,
    pub duration: Duration,
}

impl BatchReport {
    /// Row counts summed over every file.
    pub fn totals(&self) -> FileTally {
        self.files
            .iter()
            .fold(FileTally::default(), |mut acc, file| {
                acc.total += file.tally.total;
                acc.processed += file.tally.processed;
                acc.failed += file.tally.failed;
                acc
            })
    }

    pub fn failed_files(&self) -> usize {
        self.files.iter().filter(|file| file.outcome.is_failed()).count()
    }
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub source_id: String,
    pub path: PathBuf,
    pub tally: FileTally,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Rows were processed and the file was moved to this path.
    Archived(PathBuf),
    /// The file was abandoned and left in place.
    Failed(String),
}

impl FileOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn archive_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Archived(path) => Some(path),
            Self::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDirectory {
    pub source_id: String,
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Missing,
    Empty,
    Unreadable(String),
}

impl SkipReason {
    pub fn label(&self) -> &str {
        match self {
            Self::Missing => "missing",
            Self::Empty => "no csv files",
            Self::Unreadable(message) => message,
        }
    }
}
