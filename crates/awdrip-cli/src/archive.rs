//! Relocation of processed source files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

use awdrip_emit::FILE_TIMESTAMP_FORMAT;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("source file has no usable name: {path}")]
    InvalidName { path: PathBuf },

    #[error("failed to create archive directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// `<archive_dir>/<stem>.<dir_name>_<timestamp>.csv`, with `_<n>` appended
/// to the timestamp when that name is taken.
pub fn archive_destination(
    source: &Path,
    archive_dir: &Path,
    dir_name: &str,
    timestamp: NaiveDateTime,
) -> Result<PathBuf, ArchiveError> {
    let stem = source
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| ArchiveError::InvalidName {
            path: source.to_path_buf(),
        })?;
    let base = format!("{stem}.{dir_name}_{}", timestamp.format(FILE_TIMESTAMP_FORMAT));
    let mut candidate = archive_dir.join(format!("{base}.csv"));
    let mut suffix = 1u32;
    while candidate.exists() {
        candidate = archive_dir.join(format!("{base}_{suffix}.csv"));
        suffix += 1;
    }
    Ok(candidate)
}

/// Move `source` into `archive_dir`, creating it if needed.
pub fn archive_source_file(
    source: &Path,
    archive_dir: &Path,
    dir_name: &str,
    timestamp: NaiveDateTime,
) -> Result<PathBuf, ArchiveError> {
    fs::create_dir_all(archive_dir).map_err(|source| ArchiveError::CreateDir {
        path: archive_dir.to_path_buf(),
        source,
    })?;
    let destination = archive_destination(source, archive_dir, dir_name, timestamp)?;
    move_file(source, &destination).map_err(|err| ArchiveError::Move {
        from: source.to_path_buf(),
        to: destination.clone(),
        source: err,
    })?;
    Ok(destination)
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        other => other,
    }
}
