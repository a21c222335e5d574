//! Batch orchestration: discover, emit, archive.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use thiserror::Error;
use tracing::{error, info, info_span};

use awdrip_catalog::{CatalogError, ReferenceDocument, Settings, load_template};
use awdrip_emit::{
    DATED_FOLDER_FORMAT, DocumentEmitter, EmitError, EmitOutcome, ErrorScope, OutputLayout,
    SourceContext,
};
use awdrip_ingest::{DelimitedRecordReader, IngestError, ReaderOptions, RowError, list_csv_files};
use awdrip_model::{
    FileTally, OutputTemplate, POLICY_NUMBER_COLUMN, SYSTEM_ID_COLUMN, SourceDirectory,
};

use crate::archive::{ArchiveError, archive_source_file};
use crate::types::{BatchReport, FileOutcome, FileReport, SkipReason, SkippedDirectory};

/// Template and reference data for one batch.
#[derive(Debug, Clone)]
pub struct BatchInputs {
    pub template: OutputTemplate,
    pub reference: ReferenceDocument,
}

impl BatchInputs {
    /// Load the documents named by `settings`.
    pub fn load(settings: &Settings) -> Result<Self, CatalogError> {
        let template = load_template(&settings.template_path)?;
        let reference = ReferenceDocument::load(&settings.reference_path)?;
        info!(
            fields = template.len(),
            destinations = reference.catalog.destination_count(),
            statuses = reference.catalog.status_count(),
            sources = reference.sources.len(),
            "configuration loaded"
        );
        Ok(Self {
            template,
            reference,
        })
    }
}

/// Failures that stop a batch before any file is touched.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Reader(#[from] IngestError),
}

/// Reasons a source file is abandoned and left in place.
#[derive(Debug, Error)]
enum FileError {
    #[error(transparent)]
    Open(#[from] IngestError),
    #[error(transparent)]
    Read(#[from] RowError),
    #[error("row {row}: {source}")]
    Emit {
        row: usize,
        policy: String,
        #[source]
        source: EmitError,
    },
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

impl FileError {
    /// Row and policy number of the row that abandoned the file, if any.
    fn row_context(&self) -> (Option<usize>, Option<&str>) {
        match self {
            Self::Read(err) => (Some(err.row()), None),
            Self::Emit { row, policy, .. } => (Some(*row), Some(policy.as_str())),
            Self::Open(_) | Self::Archive(_) => (None, None),
        }
    }
}

struct BatchContext<'a> {
    inputs: &'a BatchInputs,
    layout: OutputLayout,
    archive_dir: PathBuf,
    reader_options: ReaderOptions,
}

/// Run one batch over every configured source directory.
///
/// Only setup failures are returned. Row and file failures are logged and
/// recorded in the report.
pub fn run_batch(settings: &Settings, inputs: &BatchInputs) -> Result<BatchReport, BatchError> {
    let started = Instant::now();
    let started_at = Local::now().naive_local();
    let date = started_at.date();
    let batch_span = info_span!("batch", date = %date.format(DATED_FOLDER_FORMAT));
    let _batch_guard = batch_span.enter();

    let layout = OutputLayout::dated(&settings.staging_dir, &settings.output_dir, date);
    let archive_dir = settings
        .archive_dir
        .join(date.format(DATED_FOLDER_FORMAT).to_string());
    for dir in [&layout.staging_dir, &layout.output_dir, &archive_dir] {
        std::fs::create_dir_all(dir).map_err(|source| BatchError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }
    let ctx = BatchContext {
        inputs,
        layout,
        archive_dir,
        reader_options: ReaderOptions::with_delimiter(settings.delimiter)?,
    };
    info!(sources = inputs.reference.sources.len(), "batch started");

    let mut files = Vec::new();
    let mut skipped = Vec::new();
    for source in &inputs.reference.sources {
        let span = info_span!(
            "source_dir",
            id = %source.id,
            path = %source.path.display()
        );
        let _guard = span.enter();
        match discover(source) {
            Ok(paths) => {
                for path in paths {
                    files.push(process_file(&ctx, source, &path));
                }
            }
            Err(reason) => skipped.push(SkippedDirectory {
                source_id: source.id.clone(),
                path: source.path.clone(),
                reason,
            }),
        }
    }

    let report = BatchReport {
        started_at,
        date,
        files,
        skipped,
        duration: started.elapsed(),
    };
    let totals = report.totals();
    info!(
        files = report.files.len(),
        failed_files = report.failed_files(),
        skipped_dirs = report.skipped.len(),
        total = totals.total,
        processed = totals.processed,
        ignored = totals.ignored(),
        failed = totals.failed,
        duration_ms = report.duration.as_millis(),
        "batch complete"
    );
    Ok(report)
}

fn discover(source: &SourceDirectory) -> Result<Vec<PathBuf>, SkipReason> {
    match list_csv_files(&source.path) {
        Ok(paths) if paths.is_empty() => {
            info!("no source files found");
            Err(SkipReason::Empty)
        }
        Ok(paths) => {
            info!(count = paths.len(), "source files found");
            Ok(paths)
        }
        Err(IngestError::DirectoryNotFound { .. }) => {
            info!("source directory not found, skipping");
            Err(SkipReason::Missing)
        }
        Err(error) => {
            error!(%error, "failed to list source directory");
            Err(SkipReason::Unreadable(error.to_string()))
        }
    }
}

fn process_file(ctx: &BatchContext<'_>, source: &SourceDirectory, path: &Path) -> FileReport {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let span = info_span!("file", file = %file_name);
    let _guard = span.enter();
    let start = Instant::now();

    let mut tally = FileTally::default();
    let dir_name = source.dir_name();
    let result = emit_rows(ctx, path, &dir_name, &file_name, &mut tally).and_then(|()| {
        archive_source_file(path, &ctx.archive_dir, &dir_name, Local::now().naive_local())
            .map_err(FileError::from)
    });

    let outcome = match result {
        Ok(archived) => {
            info!(
                file = %file_name,
                path = %archived.display(),
                total = tally.total,
                processed = tally.processed,
                ignored = tally.ignored(),
                failed = tally.failed,
                duration_ms = start.elapsed().as_millis(),
                "source file archived"
            );
            FileOutcome::Archived(archived)
        }
        Err(error) => {
            let (row, policy) = error.row_context();
            error!(
                file = %file_name,
                row,
                policy,
                %error,
                total = tally.total,
                processed = tally.processed,
                "source file abandoned"
            );
            FileOutcome::Failed(error.to_string())
        }
    };

    FileReport {
        source_id: source.id.clone(),
        path: path.to_path_buf(),
        tally,
        outcome,
    }
}

fn emit_rows(
    ctx: &BatchContext<'_>,
    path: &Path,
    dir_name: &str,
    file_name: &str,
    tally: &mut FileTally,
) -> Result<(), FileError> {
    let reader = DelimitedRecordReader::open(path, ctx.reader_options)?;
    if reader.has_header() {
        reader.require_columns(&[SYSTEM_ID_COLUMN, POLICY_NUMBER_COLUMN])?;
    }
    let mut emitter = DocumentEmitter::new(
        &ctx.inputs.template,
        &ctx.inputs.reference.catalog,
        &ctx.layout,
        SourceContext {
            dir_name: dir_name.to_string(),
            file_name: file_name.to_string(),
        },
    );

    for row in reader {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                tally.record_failed();
                if err.is_fatal() {
                    return Err(err.into());
                }
                error!(
                    file = %file_name,
                    row = err.row(),
                    error = %err,
                    "row could not be parsed"
                );
                continue;
            }
        };
        let policy = row.record.trimmed(POLICY_NUMBER_COLUMN).to_string();
        match emitter.emit(&row.record) {
            Ok(EmitOutcome::Written(doc)) => {
                tally.record_processed();
                info!(
                    file = %file_name,
                    row = row.number,
                    policy = %policy,
                    sequence = doc.sequence,
                    path = %doc.output_path.display(),
                    "document emitted"
                );
            }
            Ok(EmitOutcome::Ignored(admission)) => {
                tally.record_ignored();
                info!(
                    file = %file_name,
                    row = row.number,
                    policy = %policy,
                    system_id = %row.record.trimmed(SYSTEM_ID_COLUMN),
                    reason = admission.reason(),
                    "row ignored"
                );
            }
            Err(err) if err.scope() == ErrorScope::Row => {
                tally.record_failed();
                error!(
                    file = %file_name,
                    row = row.number,
                    policy = %policy,
                    error = %err,
                    "row could not be resolved"
                );
            }
            Err(err) => {
                tally.record_failed();
                return Err(FileError::Emit {
                    row: row.number,
                    policy,
                    source: err,
                });
            }
        }
    }
    Ok(())
}
