//! Per-record acceptance and two-phase document emission.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::debug;

use awdrip_catalog::TranslationCatalog;
use awdrip_model::{
    InputRecord, OutputTemplate, POLICY_NOT_AVAILABLE, POLICY_NUMBER_COLUMN, SYSTEM_ID_COLUMN,
};

use crate::document::{Document, write_document};
use crate::error::{EmitError, ResolveError};
use crate::resolver::FieldResolver;

/// Timestamp embedded in output and archive file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Name of the dated staging and archive subfolders.
pub const DATED_FOLDER_FORMAT: &str = "%m-%d-%Y";

/// Outcome of the acceptance check for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    /// The system id has no destination entry.
    UnknownSystemId,
    /// The destination entry is the exclusion marker.
    Excluded,
    /// The policy number is the not-available marker.
    PolicyNotAvailable,
}

impl Admission {
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::UnknownSystemId => "system id not in catalog",
            Self::Excluded => "system id excluded",
            Self::PolicyNotAvailable => "policy number not available",
        }
    }
}

/// Decide whether a record with these key values is exported.
///
/// Both values are expected to be trimmed already.
pub fn admission(catalog: &TranslationCatalog, system_id: &str, policy_number: &str) -> Admission {
    match catalog.destination(system_id) {
        None => Admission::UnknownSystemId,
        Some(destination) if destination.is_excluded() => Admission::Excluded,
        Some(_) if policy_number == POLICY_NOT_AVAILABLE => Admission::PolicyNotAvailable,
        Some(_) => Admission::Accepted,
    }
}

/// `AWDRIP_<dir>_<file>_<timestamp>_<sequence>.xml`
pub fn document_file_name(
    dir_name: &str,
    file_name: &str,
    timestamp: NaiveDateTime,
    sequence: u32,
) -> String {
    format!(
        "AWDRIP_{dir_name}_{file_name}_{}_{sequence}.xml",
        timestamp.format(FILE_TIMESTAMP_FORMAT)
    )
}

/// Where emitted documents go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Dated staging folder. Staged copies stay behind as the XML archive.
    pub staging_dir: PathBuf,
    /// Folder the downstream consumer picks documents up from.
    pub output_dir: PathBuf,
}

impl OutputLayout {
    pub fn dated(staging_root: &Path, output_dir: &Path, date: NaiveDate) -> Self {
        Self {
            staging_dir: staging_root.join(date.format(DATED_FOLDER_FORMAT).to_string()),
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Create both folders if they are missing.
    pub fn ensure(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.staging_dir)?;
        fs::create_dir_all(&self.output_dir)
    }
}

/// Names of the source file being emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub dir_name: String,
    /// File name including its extension.
    pub file_name: String,
}

/// A document that reached the output folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedDocument {
    pub sequence: u32,
    pub staging_path: PathBuf,
    pub output_path: PathBuf,
    pub document: Document,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    Written(EmittedDocument),
    Ignored(Admission),
}

/// Emits one document per accepted record of a single source file.
///
/// The sequence counter is local to the emitter, so one emitter is created
/// per source file.
pub struct DocumentEmitter<'a> {
    template: &'a OutputTemplate,
    catalog: &'a TranslationCatalog,
    layout: &'a OutputLayout,
    source: SourceContext,
    sequence: u32,
    clock: fn() -> NaiveDateTime,
}

impl<'a> DocumentEmitter<'a> {
    pub fn new(
        template: &'a OutputTemplate,
        catalog: &'a TranslationCatalog,
        layout: &'a OutputLayout,
        source: SourceContext,
    ) -> Self {
        Self {
            template,
            catalog,
            layout,
            source,
            sequence: 0,
            clock: local_now,
        }
    }

    /// Replace the clock used for file name timestamps.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Last sequence number handed out.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn source(&self) -> &SourceContext {
        &self.source
    }

    /// Emit `record` if it is accepted.
    ///
    /// The sequence counter advances before resolution, so a record that
    /// fails to resolve still consumes a number.
    pub fn emit(&mut self, record: &InputRecord) -> Result<EmitOutcome, EmitError> {
        let system_id = record.trimmed(SYSTEM_ID_COLUMN);
        let policy_number = record.trimmed(POLICY_NUMBER_COLUMN);
        let admission = admission(self.catalog, system_id, policy_number);
        if !admission.is_accepted() {
            return Ok(EmitOutcome::Ignored(admission));
        }

        self.sequence += 1;
        let sequence = self.sequence;
        let document = self.build_document(record, system_id)?;

        let file_name = document_file_name(
            &self.source.dir_name,
            &self.source.file_name,
            (self.clock)(),
            sequence,
        );
        let staging_path = self.layout.staging_dir.join(&file_name);
        stage(&staging_path, &document)?;

        let output_path = self.layout.output_dir.join(&file_name);
        publish(&staging_path, &output_path).map_err(|source| EmitError::Publish {
            staging: staging_path.clone(),
            output: output_path.clone(),
            source,
        })?;
        debug!(
            path = %output_path.display(),
            sequence,
            fields = document.len(),
            "document published"
        );

        Ok(EmitOutcome::Written(EmittedDocument {
            sequence,
            staging_path,
            output_path,
            document,
        }))
    }

    /// Resolve every template field for `record`. Nothing is written.
    ///
    /// All fields are resolved before any output exists, so a failure leaves
    /// no partial document behind.
    pub fn build_document(
        &self,
        record: &InputRecord,
        system_id: &str,
    ) -> Result<Document, ResolveError> {
        let resolver = FieldResolver::new(self.catalog);
        let mut document = Document::new();
        for field in self.template {
            let resolved = resolver.resolve(field, record, system_id)?;
            if resolved.emit() {
                document.push(field.name.as_str(), resolved.value.trim());
            }
        }
        Ok(document)
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Existing documents are never replaced; a taken name fails with
/// `AlreadyExists`.
fn create_new(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

fn stage(path: &Path, document: &Document) -> Result<(), EmitError> {
    let stage_err = |source| EmitError::Stage {
        path: path.to_path_buf(),
        source,
    };
    let file = create_new(path).map_err(stage_err)?;
    let writer = write_document(BufWriter::new(file), document).map_err(stage_err)?;
    let file = writer
        .into_inner()
        .map_err(|err| stage_err(err.into_error()))?;
    file.sync_all().map_err(stage_err)
}

fn publish(staging: &Path, output: &Path) -> io::Result<()> {
    let mut source = File::open(staging)?;
    let mut target = create_new(output)?;
    io::copy(&mut source, &mut target)?;
    target.sync_all()
}
