//! Source ingestion for the AWDRIP translator.
//!
//! - [`discovery`] lists the `.csv` files of a source directory.
//! - [`reader`] turns one delimited file into a sequence of [`InputRecord`]s,
//!   reporting malformed rows individually so the rest of the file survives.
//!
//! [`InputRecord`]: awdrip_model::InputRecord

pub mod discovery;
pub mod error;
pub mod reader;

pub use discovery::list_csv_files;
pub use error::{IngestError, Result, RowError};
pub use reader::{DelimitedRecordReader, ReaderOptions, SourceRow};
