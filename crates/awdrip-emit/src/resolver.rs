//! Per-field value resolution.

use awdrip_catalog::TranslationCatalog;
use awdrip_model::{FieldStrategy, FieldTemplate, InputRecord, WorkStatus};

use crate::error::ResolveError;

/// A resolved field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
}

impl Resolved {
    /// Only values that are non-empty after trimming are written.
    pub fn emit(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// Resolves template fields against records using the translation catalog.
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'a> {
    catalog: &'a TranslationCatalog,
}

impl<'a> FieldResolver<'a> {
    pub fn new(catalog: &'a TranslationCatalog) -> Self {
        Self { catalog }
    }

    pub fn resolve(
        &self,
        field: &FieldTemplate,
        record: &InputRecord,
        system_id: &str,
    ) -> Result<Resolved, ResolveError> {
        let value = match &field.strategy {
            FieldStrategy::Copy { column } => copy(field, record, column)?,
            FieldStrategy::Unit { fallback_column } => match self.catalog.destination(system_id) {
                Some(destination) => destination.as_str().to_string(),
                None => {
                    let column = fallback_column.as_deref().ok_or_else(|| {
                        ResolveError::NoUnitSource {
                            field: field.name.clone(),
                            system_id: system_id.to_string(),
                        }
                    })?;
                    copy(field, record, column)?
                }
            },
            FieldStrategy::Literal { value } => value.clone(),
            FieldStrategy::WorkType => self.status(field, system_id)?.work_type.clone(),
            FieldStrategy::Status => self.status(field, system_id)?.status.clone(),
        };
        Ok(Resolved { value })
    }

    fn status(
        &self,
        field: &FieldTemplate,
        system_id: &str,
    ) -> Result<&'a WorkStatus, ResolveError> {
        self.catalog
            .status(system_id)
            .ok_or_else(|| ResolveError::MissingStatus {
                field: field.name.clone(),
                system_id: system_id.to_string(),
            })
    }
}

fn copy(field: &FieldTemplate, record: &InputRecord, column: &str) -> Result<String, ResolveError> {
    record
        .get(column)
        .map(str::to_string)
        .ok_or_else(|| ResolveError::MissingColumn {
            field: field.name.clone(),
            column: column.to_string(),
        })
}
