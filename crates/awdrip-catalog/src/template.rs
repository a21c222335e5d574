//! Output template document.
//!
//! ```toml
//! [[field]]
//! name = "POLN"
//! column = "PolicyNumber"
//!
//! [[field]]
//! name = "UNIT"
//! column = "UnitCode"   # fallback when the catalog has no destination
//!
//! [[field]]
//! name = "SOON"
//! literal = "Y"
//!
//! [[field]]
//! name = "WRKT"
//! ```
//!
//! Each field maps to exactly one strategy, decided by its name. The mapping
//! is checked here once so the resolver never has to guess per row.

use std::collections::BTreeSet;
use std::path::Path;

use awdrip_model::{FieldStrategy, FieldTemplate, OutputTemplate, ReservedField};
use serde::Deserialize;

use crate::error::{CatalogError, Result, read_document};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateDocument {
    #[serde(default, rename = "field")]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldEntry {
    name: String,
    #[serde(default)]
    column: Option<String>,
    #[serde(default)]
    literal: Option<String>,
}

/// Load and validate the template document at `path`.
pub fn load_template(path: &Path) -> Result<OutputTemplate> {
    let text = read_document(path)?;
    parse_template(&text, path)
}

/// Parse template text; `path` is only used in error messages.
pub fn parse_template(text: &str, path: &Path) -> Result<OutputTemplate> {
    let document: TemplateDocument =
        toml::from_str(text).map_err(|e| CatalogError::toml(path, e))?;
    let invalid = |message: String| CatalogError::InvalidTemplate {
        path: path.to_path_buf(),
        message,
    };

    if document.fields.is_empty() {
        return Err(invalid("template defines no fields".to_string()));
    }

    let mut seen = BTreeSet::new();
    let mut fields = Vec::with_capacity(document.fields.len());
    for entry in document.fields {
        let name = entry.name.trim().to_string();
        if name.is_empty() {
            return Err(invalid("field name must not be empty".to_string()));
        }
        if !seen.insert(name.clone()) {
            return Err(invalid(format!("duplicate field {name}")));
        }
        let strategy = strategy_for(&name, entry.column, entry.literal).map_err(invalid)?;
        fields.push(FieldTemplate::new(name, strategy));
    }
    Ok(OutputTemplate::new(fields))
}

fn strategy_for(
    name: &str,
    column: Option<String>,
    literal: Option<String>,
) -> std::result::Result<FieldStrategy, String> {
    let column = column
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    match ReservedField::from_name(name) {
        Some(ReservedField::Soon) => {
            if column.is_some() {
                return Err(format!("{name} takes a literal, not a column"));
            }
            let value = literal.ok_or_else(|| format!("{name} requires a literal"))?;
            Ok(FieldStrategy::Literal { value })
        }
        Some(ReservedField::Unit) => {
            reject_literal(name, literal.as_ref())?;
            Ok(FieldStrategy::Unit {
                fallback_column: column,
            })
        }
        Some(reserved @ (ReservedField::WorkType | ReservedField::Status)) => {
            reject_literal(name, literal.as_ref())?;
            if column.is_some() {
                return Err(format!("{name} is read from the status table and takes no column"));
            }
            Ok(match reserved {
                ReservedField::WorkType => FieldStrategy::WorkType,
                _ => FieldStrategy::Status,
            })
        }
        None => {
            reject_literal(name, literal.as_ref())?;
            let column = column.ok_or_else(|| format!("{name} requires a source column"))?;
            Ok(FieldStrategy::Copy { column })
        }
    }
}

fn reject_literal(name: &str, literal: Option<&String>) -> std::result::Result<(), String> {
    if literal.is_some() {
        Err(format!("{name} does not accept a literal"))
    } else {
        Ok(())
    }
}
