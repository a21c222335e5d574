//! Reference document: translation tables and source directories.
//!
//! ```toml
//! [destinations]
//! "100" = "UNITX"
//! "300" = "Exclude"
//!
//! [[status]]
//! system_id = "100"
//! work_type = "CLAIM"
//! status = "OPEN"
//!
//! [[source]]
//! id = "claims"
//! path = "/data/inbound/claims"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use awdrip_model::{Destination, SourceDirectory, WorkStatus};
use serde::Deserialize;
use tracing::warn;

use crate::catalog::TranslationCatalog;
use crate::error::{CatalogError, Result, read_document};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReference {
    #[serde(default)]
    destinations: BTreeMap<String, String>,
    #[serde(default)]
    status: Vec<RawStatus>,
    #[serde(default, rename = "source")]
    sources: Vec<SourceDirectory>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStatus {
    system_id: String,
    work_type: String,
    status: String,
}

/// Everything loaded from the reference document.
#[derive(Debug, Clone)]
pub struct ReferenceDocument {
    pub catalog: TranslationCatalog,
    pub sources: Vec<SourceDirectory>,
}

impl ReferenceDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_document(path)?;
        Self::parse(&text, path)
    }

    /// Parse reference text. Relative source paths resolve against the
    /// document's directory.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let raw: RawReference = toml::from_str(text).map_err(|e| CatalogError::toml(path, e))?;
        let invalid = |message: String| CatalogError::InvalidReference {
            path: path.to_path_buf(),
            message,
        };

        let mut destinations = Vec::with_capacity(raw.destinations.len());
        let mut destination_ids = BTreeSet::new();
        for (id, value) in raw.destinations {
            let id = id.trim().to_string();
            if id.is_empty() {
                return Err(invalid("destination id must not be empty".to_string()));
            }
            if !destination_ids.insert(id.clone()) {
                return Err(invalid(format!("duplicate destination id {id}")));
            }
            destinations.push((id, Destination::parse(&value)));
        }

        let status_rows = raw.status.into_iter().map(|row| {
            (
                row.system_id.trim().to_string(),
                WorkStatus {
                    work_type: row.work_type.trim().to_string(),
                    status: row.status.trim().to_string(),
                },
            )
        });
        let (catalog, shadowed) = TranslationCatalog::build(destinations, status_rows);
        for id in &shadowed {
            warn!(
                path = %path.display(),
                system_id = %id,
                "duplicate status rows; using the first"
            );
        }

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let mut seen = BTreeSet::new();
        let mut sources = Vec::with_capacity(raw.sources.len());
        for source in raw.sources {
            let id = source.id.trim().to_string();
            if id.is_empty() {
                return Err(invalid("source id must not be empty".to_string()));
            }
            if !seen.insert(id.clone()) {
                return Err(CatalogError::DuplicateSource {
                    path: path.to_path_buf(),
                    id,
                });
            }
            sources.push(SourceDirectory {
                id,
                path: resolve(base, source.path),
            });
        }

        Ok(Self { catalog, sources })
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() && !base.as_os_str().is_empty() {
        base.join(path)
    } else {
        path
    }
}
