//! Field resolution and document emission.
//!
//! - [`resolver`]: one template field + one record → one value.
//! - [`document`]: the XML layout of an emitted document.
//! - [`emitter`]: acceptance policy, file naming and the two-phase
//!   staging-then-publish write.

pub mod document;
pub mod emitter;
pub mod error;
pub mod resolver;

pub use document::{Document, DocumentField, ROOT_ELEMENT, render_document, write_document};
pub use emitter::{
    Admission, DATED_FOLDER_FORMAT, DocumentEmitter, EmitOutcome, EmittedDocument,
    FILE_TIMESTAMP_FORMAT, OutputLayout, SourceContext, admission, document_file_name,
};
pub use error::{EmitError, ErrorScope, ResolveError};
pub use resolver::{FieldResolver, Resolved};
